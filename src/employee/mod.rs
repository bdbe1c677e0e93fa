//! Employee service surface targeted by the logging rules.
//!
//! The selectors in [`crate::logging::default_rules`] name these methods by
//! their service-level names (`addEmployee`, `deleteEmployee`, ...).
//! [`Advised`] exposes the same operations with advice applied.

mod mock;

use std::fmt;

use crate::advice::Advised;
use crate::args;
use crate::error::{Failure, Result};

pub use mock::MockEmployeeService;

pub const ADD_EMPLOYEE: &str = "addEmployee";
pub const DELETE_EMPLOYEE: &str = "deleteEmployee";
pub const UPDATE_EMPLOYEE: &str = "updateEmployee";
pub const GET_EMPLOYEE_BY_ID: &str = "getEmployeeById";

/// An employee record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub salary: u64,
}

impl Employee {
    pub fn new(id: u64, name: impl Into<String>, salary: u64) -> Self {
        Self {
            id,
            name: name.into(),
            salary,
        }
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Employee{{id={}, name={}, salary={}}}",
            self.id, self.name, self.salary
        )
    }
}

/// Operations on the employee roster.
///
/// Implementations:
/// - `MockEmployeeService`: In-memory roster for testing and the demo binary
pub trait EmployeeService: Send + Sync {
    /// Add an employee, returning true if it was stored.
    fn add_employee(&self, name: &str, salary: u64) -> std::result::Result<bool, Failure>;

    /// Remove an employee, returning true if one was removed.
    fn delete_employee(&self, id: u64) -> std::result::Result<bool, Failure>;

    /// Replace an existing employee record. Fails if the id is unknown.
    fn update_employee(&self, employee: Employee) -> std::result::Result<Employee, Failure>;

    /// Look up an employee. Fails if the id is unknown.
    fn get_employee_by_id(&self, id: u64) -> std::result::Result<Employee, Failure>;
}

impl<S: EmployeeService> Advised<S> {
    pub fn add_employee(&self, name: &str, salary: u64) -> Result<bool> {
        self.call(ADD_EMPLOYEE, args![name.to_string(), salary], |s| {
            s.add_employee(name, salary)
        })
    }

    pub fn delete_employee(&self, id: u64) -> Result<bool> {
        self.call(DELETE_EMPLOYEE, args![id], |s| s.delete_employee(id))
    }

    pub fn update_employee(&self, employee: Employee) -> Result<Employee> {
        self.call(UPDATE_EMPLOYEE, args![employee.clone()], |s| {
            s.update_employee(employee)
        })
    }

    pub fn get_employee_by_id(&self, id: u64) -> Result<Employee> {
        self.call(GET_EMPLOYEE_BY_ID, args![id], |s| s.get_employee_by_id(id))
    }
}
