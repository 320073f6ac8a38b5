//! Rule sets for each product command and query.

use super::commands::{CreateProductCommand, DeleteProductCommand, UpdateProductCommand};
use super::queries::GetProductByIdQuery;
use crate::domain::ProductDto;
use crate::validation::{Property, RuleSet, ValidationFailure, Validator};

pub const TITLE_MAX_LENGTH: usize = 20;

pub struct CreateProductValidator {
    rules: RuleSet<CreateProductCommand>,
}

impl CreateProductValidator {
    pub fn new() -> Self {
        let title = Property::new("Title", |p: &ProductDto| p.title.as_ref())
            .not_null()
            .with_message("Insert title is required.")
            .not_empty()
            .with_message("Insert title is required.")
            .maximum_length(TITLE_MAX_LENGTH)
            .with_message("Title is invalid");

        let rules = RuleSet::new().rule(
            Property::new("Product", |c: &CreateProductCommand| c.product.as_ref())
                .not_null()
                .with_message("Instance can not be null")
                .child_rules(RuleSet::new().rule(title)),
        );
        Self { rules }
    }
}

impl Validator<CreateProductCommand> for CreateProductValidator {
    fn validate(&self, instance: &CreateProductCommand) -> Vec<ValidationFailure> {
        self.rules.evaluate(instance)
    }
}

pub struct UpdateProductValidator {
    rules: RuleSet<UpdateProductCommand>,
}

impl UpdateProductValidator {
    pub fn new() -> Self {
        let fields = RuleSet::new()
            .rule(
                Property::new("Title", |p: &ProductDto| p.title.as_ref())
                    .not_null()
                    .with_message("Title must be specified"),
            )
            .rule(
                Property::new("Id", |p: &ProductDto| p.id.as_ref())
                    .not_null()
                    .with_message("Id can not be null"),
            );

        let rules = RuleSet::new().rule(
            Property::new("Product", |c: &UpdateProductCommand| c.product.as_ref())
                .not_null()
                .with_message("Product detail can not be null")
                .child_rules(fields),
        );
        Self { rules }
    }
}

impl Validator<UpdateProductCommand> for UpdateProductValidator {
    fn validate(&self, instance: &UpdateProductCommand) -> Vec<ValidationFailure> {
        self.rules.evaluate(instance)
    }
}

pub struct DeleteProductValidator {
    rules: RuleSet<DeleteProductCommand>,
}

impl DeleteProductValidator {
    pub fn new() -> Self {
        let rules = RuleSet::new().rule(
            Property::new("Id", |c: &DeleteProductCommand| c.id.as_ref())
                .not_null()
                .with_message("Id Can not be null"),
        );
        Self { rules }
    }
}

impl Validator<DeleteProductCommand> for DeleteProductValidator {
    fn validate(&self, instance: &DeleteProductCommand) -> Vec<ValidationFailure> {
        self.rules.evaluate(instance)
    }
}

/// Rejects a missing id and the zero id. A missing id breaks both rules;
/// the "empty" rule is declared first, so its message is the one that
/// surfaces through the pipeline.
pub struct GetProductByIdValidator {
    rules: RuleSet<GetProductByIdQuery>,
}

impl GetProductByIdValidator {
    pub fn new() -> Self {
        let rules = RuleSet::new().rule(
            Property::new("Id", |q: &GetProductByIdQuery| q.id.as_ref())
                .not_empty()
                .with_message("Id can not be empty")
                .not_null()
                .with_message("Id can not be null"),
        );
        Self { rules }
    }
}

impl Validator<GetProductByIdQuery> for GetProductByIdValidator {
    fn validate(&self, instance: &GetProductByIdQuery) -> Vec<ValidationFailure> {
        self.rules.evaluate(instance)
    }
}
