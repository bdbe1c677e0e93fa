//! Advised employee service wired with the default logging rules.

use std::sync::Arc;

use interpose::advice::{AdviceRegistry, Advised};
use interpose::employee::{Employee, EmployeeService, MockEmployeeService};
use interpose::logging::{self, DEFAULT_TYPE_NAME};
use interpose::sink::MemorySink;
use interpose::Error;
use tracing::Level;

fn advised_service() -> (Advised<MockEmployeeService>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let mut registry = AdviceRegistry::new(sink.clone());
    logging::install(&mut registry, &logging::default_rules(DEFAULT_TYPE_NAME)).unwrap();
    let service = Advised::new(
        MockEmployeeService::new(),
        DEFAULT_TYPE_NAME,
        Arc::new(registry),
    );
    (service, sink)
}

#[test]
fn test_add_employee_is_bracketed_by_logs() {
    let (service, sink) = advised_service();

    assert!(service.add_employee("Alice", 5000).unwrap());

    assert_eq!(
        sink.messages(),
        vec![
            "before advice running",
            "Enter: Service.addEmployee() with argument[s] = [Alice, 5000]",
            "after advice running",
            "Exit: Service.addEmployee() with argument[s] = [Alice, 5000]",
        ]
    );
    assert_eq!(service.inner().len(), 1);
}

#[test]
fn test_add_employee_failure_still_runs_after_advice() {
    let (service, sink) = advised_service();
    service.inner().set_fail_on_add(true);

    let err = service.add_employee("Alice", 5000).unwrap_err();

    let failure = err.as_failure().expect("operation failure forwarded");
    assert_eq!(failure.message(), "roster unavailable");
    assert_eq!(failure.cause_or_marker(), "mock storage offline");
    assert_eq!(
        sink.messages().last().map(String::as_str),
        Some("Exit: Service.addEmployee() with argument[s] = [Alice, 5000]")
    );
}

#[test]
fn test_get_employee_logs_result() {
    let (service, sink) = advised_service();
    service.inner().add_employee("Alice", 5000).unwrap();

    let employee = service.get_employee_by_id(1).unwrap();

    assert_eq!(employee, Employee::new(1, "Alice", 5000));
    assert_eq!(
        sink.messages(),
        vec![
            "around advice running",
            "Enter: Service.getEmployeeById() with argument[s] = [1]",
            "Exit: Service.getEmployeeById() with result = Employee { id: 1, name: \"Alice\", salary: 5000 }",
        ]
    );
}

#[test]
fn test_get_missing_employee_skips_exit_log() {
    let (service, sink) = advised_service();

    let err = service.get_employee_by_id(9).unwrap_err();

    assert_eq!(err.to_string(), "employee 9 not found");
    assert_eq!(
        sink.messages(),
        vec![
            "around advice running",
            "Enter: Service.getEmployeeById() with argument[s] = [9]",
        ]
    );
}

#[test]
fn test_delete_employee_logs_return_value() {
    let (service, sink) = advised_service();
    service.inner().add_employee("Alice", 5000).unwrap();

    assert!(service.delete_employee(1).unwrap());
    assert!(!service.delete_employee(1).unwrap());

    assert_eq!(
        sink.messages(),
        vec![
            "after-returning advice running",
            "Exit: Service.deleteEmployee() with argument[s] = [1] with return value: true",
            "after-returning advice running",
            "Exit: Service.deleteEmployee() with argument[s] = [1] with return value: false",
        ]
    );
}

#[test]
fn test_delete_failure_is_not_logged() {
    let (service, sink) = advised_service();
    service.inner().set_fail_on_delete(true);

    assert!(service.delete_employee(1).is_err());
    assert!(sink.messages().is_empty());
}

#[test]
fn test_update_missing_employee_logs_exception() {
    let (service, sink) = advised_service();

    let err = service
        .update_employee(Employee::new(42, "Nobody", 0))
        .unwrap_err();

    assert!(matches!(err, Error::Operation(ref f) if f.message() == "employee 42 not found"));
    assert_eq!(
        sink.messages_at(Level::ERROR),
        vec![
            "Exception in Service.updateEmployee() with cause = NULL, message = employee 42 not found, input args: [Employee{id=42, name=Nobody, salary=0}]"
        ]
    );
}

#[test]
fn test_update_existing_employee_is_silent() {
    let (service, sink) = advised_service();
    service.inner().add_employee("Alice", 5000).unwrap();

    let updated = service
        .update_employee(Employee::new(1, "Alice", 6000))
        .unwrap();

    assert_eq!(updated.salary, 6000);
    assert!(sink.messages().is_empty());
}

#[test]
fn test_concurrent_calls_share_one_registry() {
    let (service, sink) = advised_service();
    let service = Arc::new(service);

    std::thread::scope(|scope| {
        for i in 0..8u64 {
            let service = Arc::clone(&service);
            scope.spawn(move || {
                service.add_employee(&format!("worker-{i}"), i).unwrap();
            });
        }
    });

    assert_eq!(service.inner().len(), 8);
    assert_eq!(sink.messages().len(), 8 * 4);
}
