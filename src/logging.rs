//! Logging advice for the employee service.
//!
//! One handler per advice kind. Each writes to the registry's sink, so a
//! sink failure aborts the advised call.

use crate::advice::{
    Advice, AdviceKind, AdviceRegistry, AroundResult, Completion, HandlerResult, JoinPoint, Proceed,
    ReturnValue, Selector,
};
use crate::error::{Failure, Result};

/// Declaring type used by the default rule table.
pub const DEFAULT_TYPE_NAME: &str = "Service";

/// Binds a selector to the logging handler for one advice kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub selector: Selector,
    pub kind: AdviceKind,
}

impl Rule {
    pub fn new(selector: Selector, kind: AdviceKind) -> Self {
        Self { selector, kind }
    }
}

/// The standard rule table for the employee service declared as `type_name`.
pub fn default_rules(type_name: &str) -> Vec<Rule> {
    [
        ("addEmployee", AdviceKind::Before),
        ("addEmployee", AdviceKind::After),
        ("deleteEmployee", AdviceKind::AfterReturning),
        ("getEmployeeById", AdviceKind::Around),
        ("updateEmployee", AdviceKind::AfterThrowing),
    ]
    .into_iter()
    .map(|(method, kind)| Rule::new(Selector::new(type_name, method), kind))
    .collect()
}

/// Register the logging handler for every rule, in order.
pub fn install(registry: &mut AdviceRegistry, rules: &[Rule]) -> Result<()> {
    for rule in rules {
        registry.register(rule.selector.clone(), advice_for(rule.kind))?;
    }
    Ok(())
}

/// The logging handler for `kind`.
pub fn advice_for(kind: AdviceKind) -> Advice {
    match kind {
        AdviceKind::Before => Advice::before(log_before),
        AdviceKind::After => Advice::after(log_after),
        AdviceKind::AfterReturning => Advice::after_returning(log_after_returning),
        AdviceKind::Around => Advice::around(log_around),
        AdviceKind::AfterThrowing => Advice::after_throwing(log_after_throwing),
    }
}

fn log_before(jp: &JoinPoint<'_>) -> HandlerResult {
    jp.debug("before advice running")?;
    jp.debug(&format!(
        "Enter: {}() with argument[s] = {}",
        jp.selector(),
        jp.context().render_args()
    ))?;
    Ok(())
}

fn log_after(jp: &JoinPoint<'_>, _completion: Completion<'_>) -> HandlerResult {
    jp.debug("after advice running")?;
    jp.debug(&format!(
        "Exit: {}() with argument[s] = {}",
        jp.selector(),
        jp.context().render_args()
    ))?;
    Ok(())
}

fn log_after_returning(jp: &JoinPoint<'_>, result: &ReturnValue) -> HandlerResult {
    jp.debug("after-returning advice running")?;
    jp.debug(&format!(
        "Exit: {}() with argument[s] = {} with return value: {}",
        jp.selector(),
        jp.context().render_args(),
        result
    ))?;
    Ok(())
}

fn log_around(jp: &JoinPoint<'_>, proceed: Proceed<'_>) -> AroundResult {
    jp.debug("around advice running")?;
    if jp.debug_enabled() {
        jp.debug(&format!(
            "Enter: {}() with argument[s] = {}",
            jp.selector(),
            jp.context().render_args()
        ))?;
    }
    let result = proceed.proceed()?;
    if jp.debug_enabled() {
        jp.debug(&format!("Exit: {}() with result = {}", jp.selector(), result))?;
    }
    Ok(result)
}

fn log_after_throwing(jp: &JoinPoint<'_>, failure: &Failure) -> HandlerResult {
    jp.debug("after-throwing advice running")?;
    jp.error(&format!(
        "Exception in {}() with cause = {}, message = {}, input args: {}",
        jp.selector(),
        failure.cause_or_marker(),
        failure.message(),
        jp.context().render_args()
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracing::Level;

    use super::*;
    use crate::args;
    use crate::error::{Error, HandlerError};
    use crate::sink::MemorySink;

    #[derive(Debug, thiserror::Error)]
    #[error("row locked")]
    struct RowLocked;

    fn registry_with(sink: Arc<MemorySink>) -> AdviceRegistry {
        let mut registry = AdviceRegistry::new(sink);
        install(&mut registry, &default_rules(DEFAULT_TYPE_NAME)).unwrap();
        registry
    }

    fn selector(method: &str) -> Selector {
        Selector::new(DEFAULT_TYPE_NAME, method)
    }

    #[test]
    fn test_default_rules_table() {
        let rules = default_rules("Service");
        let rendered: Vec<String> = rules
            .iter()
            .map(|r| format!("{} {}", r.selector, r.kind))
            .collect();
        assert_eq!(
            rendered,
            vec![
                "Service.addEmployee before",
                "Service.addEmployee after",
                "Service.deleteEmployee after_returning",
                "Service.getEmployeeById around",
                "Service.updateEmployee after_throwing",
            ]
        );
    }

    #[test]
    fn test_add_logs_enter_and_exit() {
        let sink = Arc::new(MemorySink::new());
        let registry = registry_with(sink.clone());

        let added = registry
            .invoke(&selector("addEmployee"), args!["Alice", 5000], || Ok(true))
            .unwrap();

        assert!(added);
        assert_eq!(
            sink.messages(),
            vec![
                "before advice running",
                "Enter: Service.addEmployee() with argument[s] = [Alice, 5000]",
                "after advice running",
                "Exit: Service.addEmployee() with argument[s] = [Alice, 5000]",
            ]
        );
    }

    #[test]
    fn test_delete_logs_return_value() {
        let sink = Arc::new(MemorySink::new());
        let registry = registry_with(sink.clone());

        registry
            .invoke(&selector("deleteEmployee"), args![7], || Ok(true))
            .unwrap();

        assert_eq!(
            sink.messages().last().map(String::as_str),
            Some("Exit: Service.deleteEmployee() with argument[s] = [7] with return value: true")
        );
    }

    #[test]
    fn test_delete_failure_skips_after_returning() {
        let sink = Arc::new(MemorySink::new());
        let registry = registry_with(sink.clone());

        let result =
            registry.invoke::<bool, _>(&selector("deleteEmployee"), args![7], || Err(Failure::new("locked")));

        assert!(result.is_err());
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_get_logs_enter_and_result() {
        let sink = Arc::new(MemorySink::new());
        let registry = registry_with(sink.clone());

        let name = registry
            .invoke(&selector("getEmployeeById"), args![1], || Ok("Alice".to_string()))
            .unwrap();

        assert_eq!(name, "Alice");
        assert_eq!(
            sink.messages(),
            vec![
                "around advice running",
                "Enter: Service.getEmployeeById() with argument[s] = [1]",
                "Exit: Service.getEmployeeById() with result = \"Alice\"",
            ]
        );
    }

    #[test]
    fn test_get_failure_has_no_exit_log() {
        let sink = Arc::new(MemorySink::new());
        let registry = registry_with(sink.clone());

        let err = registry
            .invoke::<String, _>(&selector("getEmployeeById"), args![9], || {
                Err(Failure::new("employee 9 not found"))
            })
            .unwrap_err();

        assert_eq!(err.to_string(), "employee 9 not found");
        assert!(sink.messages().iter().all(|m| !m.starts_with("Exit:")));
    }

    #[test]
    fn test_get_skips_detail_when_debug_disabled() {
        let sink = Arc::new(MemorySink::with_level(Level::INFO));
        let registry = registry_with(sink.clone());

        registry
            .invoke(&selector("getEmployeeById"), args![1], || Ok(1u64))
            .unwrap();
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_update_failure_logs_null_cause() {
        let sink = Arc::new(MemorySink::new());
        let registry = registry_with(sink.clone());

        let err = registry
            .invoke::<bool, _>(&selector("updateEmployee"), args![42], || Err(Failure::new("not found")))
            .unwrap_err();

        assert_eq!(err.as_failure().map(Failure::message), Some("not found"));
        assert_eq!(
            sink.messages_at(Level::ERROR),
            vec!["Exception in Service.updateEmployee() with cause = NULL, message = not found, input args: [42]"]
        );
    }

    #[test]
    fn test_update_failure_logs_cause() {
        let sink = Arc::new(MemorySink::new());
        let registry = registry_with(sink.clone());

        registry
            .invoke::<bool, _>(&selector("updateEmployee"), args![42], || {
                Err(Failure::new("update failed").with_cause(RowLocked))
            })
            .unwrap_err();

        assert!(sink.messages_at(Level::ERROR)[0].contains("with cause = row locked"));
    }

    #[test]
    fn test_update_success_logs_nothing() {
        let sink = Arc::new(MemorySink::new());
        let registry = registry_with(sink.clone());

        registry
            .invoke(&selector("updateEmployee"), args![42], || Ok(true))
            .unwrap();
        assert!(sink.messages().is_empty());
    }

    #[test]
    fn test_sink_failure_aborts_call() {
        let sink = Arc::new(MemorySink::new());
        let registry = registry_with(sink.clone());
        sink.set_fail_on_emit(true);

        let mut ran = false;
        let err = registry
            .invoke(&selector("addEmployee"), args!["Bob", 1], || {
                ran = true;
                Ok(true)
            })
            .unwrap_err();

        assert!(!ran);
        assert!(matches!(
            err,
            Error::Handler {
                kind: AdviceKind::Before,
                source: HandlerError::Sink(_),
                ..
            }
        ));
    }
}
