use serde::{Deserialize, Serialize};

/// Flat product record exchanged at every boundary (commands, repository, HTTP).
///
/// Both fields are optional on the wire: `id` is unset on creation requests and
/// assigned by the store, `title` may be missing and is checked by validators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
impl ProductDto {
    pub fn new(id: Option<i32>, title: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
        }
    }
}

/// Persisted product. Once stored, `id` uniquely identifies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i32,
    pub title: String,
}

impl Product {
    pub fn new(id: i32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            title: Some(product.title),
        }
    }
}

/// Reasons a transfer object cannot become a stored product.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("Product title is required for storage")]
    MissingTitle,
    #[error("Stored product id {0} does not fit a 32-bit id")]
    IdOutOfRange(i64),
}

/// Mapping in the other direction. A missing `id` maps to `0`, which stores
/// treat as "assign one for me".
impl TryFrom<ProductDto> for Product {
    type Error = MappingError;

    fn try_from(dto: ProductDto) -> Result<Self, Self::Error> {
        let title = dto.title.ok_or(MappingError::MissingTitle)?;
        Ok(Self {
            id: dto.id.unwrap_or_default(),
            title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_json_uses_camel_case_and_accepts_missing_fields() {
        let dto: ProductDto = serde_json::from_str(r#"{"title":"Pen"}"#).unwrap();
        assert_eq!(dto, ProductDto { id: None, title: Some("Pen".into()) });

        let json = serde_json::to_string(&ProductDto::new(Some(3), "Ink")).unwrap();
        assert_eq!(json, r#"{"id":3,"title":"Ink"}"#);
    }

    #[test]
    fn test_mapping_requires_title_and_defaults_id() {
        let product = Product::try_from(ProductDto { id: None, title: Some("Pen".into()) }).unwrap();
        assert_eq!(product, Product::new(0, "Pen"));

        let err = Product::try_from(ProductDto { id: Some(1), title: None }).unwrap_err();
        assert_eq!(err, MappingError::MissingTitle);
    }
}
