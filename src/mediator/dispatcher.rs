use std::any::{type_name, Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};

use super::request::{Request, RequestHandler};
use crate::error::{ConfigurationError, DispatchError, ValidationError};
use crate::validation::Validator;

// =============================================================================
// 1. REGISTRATION TABLE
// =============================================================================

/// Validators and the handler bound to one request type.
struct Registration<R: Request> {
    validators: Vec<Arc<dyn Validator<R>>>,
    handler: Option<Arc<dyn RequestHandler<R>>>,
}

impl<R: Request> Registration<R> {
    fn empty() -> Self {
        Self {
            validators: Vec::new(),
            handler: None,
        }
    }
}

type Slots = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Collects validators and handlers, keyed by request type, into a
/// [`Mediator`]. Assembled once at startup.
#[derive(Default)]
pub struct MediatorBuilder {
    slots: Slots,
    names: HashMap<TypeId, &'static str>,
    handled: HashSet<TypeId>,
}

impl MediatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn registration_mut<R: Request>(&mut self) -> &mut Registration<R> {
        let key = TypeId::of::<R>();
        self.names.entry(key).or_insert_with(type_name::<R>);
        self.slots
            .entry(key)
            .or_insert_with(|| Box::new(Registration::<R>::empty()))
            .downcast_mut::<Registration<R>>()
            .unwrap_or_else(|| unreachable!("slot for {} holds another type", type_name::<R>()))
    }

    /// Registers the single handler for `R`. A second handler for the same
    /// request type is rejected.
    pub fn handler<R, H>(mut self, handler: H) -> Result<Self, ConfigurationError>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let registration = self.registration_mut::<R>();
        if registration.handler.is_some() {
            return Err(ConfigurationError::DuplicateHandler(type_name::<R>()));
        }
        registration.handler = Some(Arc::new(handler));
        self.handled.insert(TypeId::of::<R>());
        Ok(self)
    }

    /// Appends a validator for `R`. Validators run in registration order.
    pub fn validator<R, V>(mut self, validator: V) -> Self
    where
        R: Request,
        V: Validator<R> + 'static,
    {
        self.registration_mut::<R>().validators.push(Arc::new(validator));
        self
    }

    /// Fails if any request type got validators but no handler.
    pub fn build(self) -> Result<Mediator, ConfigurationError> {
        for (key, name) in &self.names {
            if !self.handled.contains(key) {
                return Err(ConfigurationError::MissingHandler(name));
            }
        }
        Ok(Mediator {
            slots: Arc::new(self.slots),
        })
    }
}

// =============================================================================
// 2. THE DISPATCH PIPELINE
// =============================================================================

/// Single entry point for every command and query.
///
/// `send` runs all validators registered for the request type, aborts with
/// the first failure if any rule broke, and otherwise hands the request to
/// its one handler.
#[derive(Clone)]
pub struct Mediator {
    slots: Arc<Slots>,
}

impl Mediator {
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    fn registration<R: Request>(&self) -> Option<&Registration<R>> {
        self.slots
            .get(&TypeId::of::<R>())
            .and_then(|slot| slot.downcast_ref::<Registration<R>>())
    }

    #[instrument(name = "dispatch", skip_all, fields(request = type_name::<R>()))]
    pub async fn send<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<R::Response, DispatchError> {
        let registration = self.registration::<R>();

        if let Some(registration) = registration {
            validate(&registration.validators, &request)?;
        }

        let Some(handler) = registration.and_then(|r| r.handler.clone()) else {
            error!("No handler registered");
            return Err(ConfigurationError::MissingHandler(type_name::<R>()).into());
        };

        debug!("Dispatching to handler");
        handler.handle(request, cancel).await
    }
}

fn validate<R>(validators: &[Arc<dyn Validator<R>>], request: &R) -> Result<(), ValidationError> {
    let mut failures = validators
        .iter()
        .flat_map(|validator| validator.validate(request))
        .collect::<Vec<_>>()
        .into_iter();

    let Some(first) = failures.next() else {
        return Ok(());
    };

    warn!(
        property = %first.property_name,
        failures = failures.len() + 1,
        "Request failed validation"
    );
    Err(ValidationError { failure: first })
}
