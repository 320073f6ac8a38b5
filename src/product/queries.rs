use crate::domain::ProductDto;
use crate::mediator::Request;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetProductByIdQuery {
    pub id: Option<i32>,
}

#[cfg(test)]
impl GetProductByIdQuery {
    pub fn new(id: i32) -> Self {
        Self { id: Some(id) }
    }
}

impl Request for GetProductByIdQuery {
    type Response = ProductDto;
}

/// Every stored product. Entries the store could not map come back as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetAllProductsQuery;

impl Request for GetAllProductsQuery {
    type Response = Vec<Option<ProductDto>>;
}
