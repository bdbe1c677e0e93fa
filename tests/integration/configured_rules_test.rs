//! Rule tables loaded from configuration.

use std::sync::Arc;

use interpose::advice::{AdviceRegistry, Advised};
use interpose::config::{Config, ConfigError};
use interpose::employee::MockEmployeeService;
use interpose::logging;
use interpose::sink::MemorySink;

fn service_from(yaml: &str) -> (Advised<MockEmployeeService>, Arc<MemorySink>) {
    let config = Config::from_yaml(yaml).unwrap();
    let sink = Arc::new(MemorySink::new());
    let mut registry = AdviceRegistry::new(sink.clone());
    logging::install(&mut registry, &config.rules().unwrap()).unwrap();
    let service = Advised::new(
        MockEmployeeService::new(),
        config.advice.type_name.as_str(),
        Arc::new(registry),
    );
    (service, sink)
}

#[test]
fn test_custom_type_name_matches_only_that_type() {
    let (service, sink) = service_from("advice:\n  type_name: EmployeeService\n");

    service.add_employee("Alice", 5000).unwrap();

    assert_eq!(
        sink.messages()[1],
        "Enter: EmployeeService.addEmployee() with argument[s] = [Alice, 5000]"
    );
}

#[test]
fn test_explicit_rules_replace_defaults() {
    let yaml = r#"
advice:
  rules:
    - selector: Service.getEmployeeById
      kind: after_returning
"#;
    let (service, sink) = service_from(yaml);

    service.add_employee("Alice", 5000).unwrap();
    assert!(sink.messages().is_empty());

    service.get_employee_by_id(1).unwrap();
    assert_eq!(sink.messages().len(), 2);
    assert!(sink.messages()[1].contains("with return value: Employee { id: 1"));
}

#[test]
fn test_duplicate_rules_log_twice() {
    let yaml = r#"
advice:
  rules:
    - selector: Service.deleteEmployee
      kind: after_returning
    - selector: Service.deleteEmployee
      kind: after_returning
"#;
    let (service, sink) = service_from(yaml);

    service.delete_employee(1).unwrap();
    assert_eq!(sink.messages().len(), 4);
}

#[test]
fn test_qualified_rules_need_matching_type_name() {
    let rules = r#"
  rules:
    - selector: org.acme.EmployeeService.addEmployee
      kind: before
"#;

    let unqualified = Config::from_yaml(&format!("advice:{rules}")).unwrap();
    assert!(matches!(
        unqualified.rules(),
        Err(ConfigError::TypeMismatch { ref type_name, .. }) if type_name == "Service"
    ));

    let (service, sink) = service_from(&format!("advice:\n  type_name: org.acme.EmployeeService{rules}"));
    service.add_employee("Alice", 5000).unwrap();

    assert_eq!(
        sink.messages(),
        vec![
            "before advice running",
            "Enter: org.acme.EmployeeService.addEmployee() with argument[s] = [Alice, 5000]",
        ]
    );
}
