use async_trait::async_trait;
use std::sync::Arc;

use crate::engine::AbilityContext;
use crate::errors::AbilityError;

/// Behavior fired when a walker and a location meet.
///
/// The same trait serves both sides of an encounter: walker-side abilities
/// are registered against a location pattern, location-side abilities
/// against a visiting walker type. Bodies may await external work; the
/// scheduler waits for them before moving on.
#[async_trait]
pub trait Ability: Send + Sync {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError>;

    fn name(&self) -> &str;
}

/// Adapter for synchronous closures.
pub struct FnAbility<F> {
    name: String,
    body: F,
}

#[async_trait]
impl<F> Ability for FnAbility<F>
where
    F: Fn(&mut AbilityContext<'_>) -> Result<(), AbilityError> + Send + Sync,
{
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        (self.body)(cx)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap a closure as a shareable ability.
///
/// ```ignore
/// let greet = ability_fn("greet", |cx| {
///     cx.report("hello");
///     Ok(())
/// });
/// ```
pub fn ability_fn<F>(name: impl Into<String>, body: F) -> Arc<dyn Ability>
where
    F: Fn(&mut AbilityContext<'_>) -> Result<(), AbilityError> + Send + Sync + 'static,
{
    Arc::new(FnAbility {
        name: name.into(),
        body,
    })
}
