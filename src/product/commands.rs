use crate::domain::ProductDto;
use crate::mediator::Request;

/// Store a new product. The store assigns the id when it is unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProductCommand {
    pub product: Option<ProductDto>,
}

#[cfg(test)]
impl CreateProductCommand {
    pub fn new(product: ProductDto) -> Self {
        Self {
            product: Some(product),
        }
    }
}

impl Request for CreateProductCommand {
    type Response = ProductDto;
}

/// Replace an existing product record as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProductCommand {
    pub product: Option<ProductDto>,
}

#[cfg(test)]
impl UpdateProductCommand {
    pub fn new(product: ProductDto) -> Self {
        Self {
            product: Some(product),
        }
    }
}

impl Request for UpdateProductCommand {
    type Response = Option<ProductDto>;
}

/// Remove a product by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteProductCommand {
    pub id: Option<i32>,
}

#[cfg(test)]
impl DeleteProductCommand {
    pub fn new(id: i32) -> Self {
        Self { id: Some(id) }
    }
}

impl Request for DeleteProductCommand {
    type Response = Option<ProductDto>;
}
