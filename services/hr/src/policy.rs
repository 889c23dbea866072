//! Policy engine: visibility scoping and mutation rules
//!
//! Every read goes through [`visible_scope`] and every write through
//! [`authorize`]. Handlers never branch on roles themselves; the rules for
//! each (resource, action) pair live here and nowhere else.

use uuid::Uuid;

use crate::actor::{Actor, Role};
use crate::error::{HrError, HrResult};

/// Entity kinds the policy engine knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Employee,
    Department,
    Position,
    ContractType,
    Contract,
    Leave,
    Attendance,
    Payslip,
    Evaluation,
    Training,
    Enrollment,
    JobOffer,
}

/// Mutating operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
}

/// The record set an actor may read for a given resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every record
    All,
    /// Records belonging to one department
    Department(Uuid),
    /// The actor's own record plus records of department colleagues
    OwnAndDepartment {
        employee_id: Uuid,
        department_id: Option<Uuid>,
    },
    /// Only records belonging to the actor
    Own(Uuid),
    /// Nothing is visible; an empty result set, not an error
    Nothing,
}

/// Properties of the record a mutation is aimed at
#[derive(Debug, Clone, Copy, Default)]
pub struct Target {
    /// Department the record belongs to (through its position where indirect)
    pub department_id: Option<Uuid>,
    /// Role carried by the record, for employee targets
    pub employee_role: Option<Role>,
    /// Employee the record belongs to
    pub employee_id: Option<Uuid>,
    /// Role the mutation assigns, for employee updates
    pub new_role: Option<Role>,
    /// Department whose leadership the mutation assigns
    pub lead_department_id: Option<Uuid>,
}

impl Target {
    pub fn department(department_id: Option<Uuid>) -> Self {
        Target {
            department_id,
            ..Default::default()
        }
    }

    pub fn employee(employee_id: Uuid, role: Role, department_id: Option<Uuid>) -> Self {
        Target {
            department_id,
            employee_role: Some(role),
            employee_id: Some(employee_id),
            ..Default::default()
        }
    }
}

/// Compute the visibility scope of `actor` for `resource`.
///
/// Employees see their department colleagues in the employee directory but
/// only their own leave, attendance, payroll, evaluation and enrollment
/// records. The training catalog is company-wide; job offers show only for
/// the actor's own department.
pub fn visible_scope(actor: &Actor, resource: Resource) -> Scope {
    if actor.role.is_hr_class() {
        return Scope::All;
    }

    if actor.role == Role::Manager {
        return match actor.home_department() {
            Some(dept) => match resource {
                Resource::Training | Resource::ContractType => Scope::All,
                _ => Scope::Department(dept),
            },
            // A manager with no position and no led department sees nothing.
            None => Scope::Nothing,
        };
    }

    match resource {
        Resource::Employee => Scope::OwnAndDepartment {
            employee_id: actor.employee_id,
            department_id: actor.department_id,
        },
        Resource::Leave
        | Resource::Attendance
        | Resource::Payslip
        | Resource::Evaluation
        | Resource::Contract
        | Resource::Enrollment => Scope::Own(actor.employee_id),
        Resource::Department | Resource::Position | Resource::JobOffer => {
            match actor.department_id {
                Some(dept) => Scope::Department(dept),
                None => Scope::Nothing,
            }
        }
        Resource::Training | Resource::ContractType => Scope::All,
    }
}

/// Whether a record owned by `employee_id` in `department_id` falls inside
/// `scope`. Used by repositories to tell "exists but forbidden" apart from
/// "does not exist".
pub fn scope_permits(scope: Scope, employee_id: Option<Uuid>, department_id: Option<Uuid>) -> bool {
    match scope {
        Scope::All => true,
        Scope::Department(dept) => department_id == Some(dept),
        Scope::OwnAndDepartment {
            employee_id: own,
            department_id: dept,
        } => employee_id == Some(own) || (dept.is_some() && department_id == dept),
        Scope::Own(own) => employee_id == Some(own),
        Scope::Nothing => false,
    }
}

/// Decide whether `actor` may perform `action` on `resource`.
///
/// `target` carries the department/role/owner of the record being touched;
/// it is `None` for creations of department-less records.
pub fn authorize(
    actor: &Actor,
    action: Action,
    resource: Resource,
    target: Option<&Target>,
) -> HrResult<()> {
    match resource {
        Resource::Department => authorize_department(actor, action, target),
        Resource::Employee => authorize_employee(actor, action, target),
        // HR-owned records: positions, payroll, contract policies, contracts,
        // trainings and job offers are administered by HR or above.
        Resource::Position
        | Resource::ContractType
        | Resource::Contract
        | Resource::Payslip
        | Resource::Training
        | Resource::JobOffer => require(
            actor.role.is_hr_class(),
            "HR privileges are required for this record",
        ),
        Resource::Evaluation => authorize_department_scoped(actor, target),
        Resource::Attendance => authorize_attendance(actor, target),
        Resource::Enrollment => authorize_enrollment(actor, target),
        // Leave submission is open to every employee for themselves;
        // adjudication runs through `leave::authorize_adjudication`.
        Resource::Leave => authorize_own_record(actor, target),
    }
}

fn authorize_department(actor: &Actor, action: Action, target: Option<&Target>) -> HrResult<()> {
    match action {
        Action::Create | Action::Delete => require(
            actor.role == Role::SuperAdmin,
            "only a super admin may create or delete departments",
        ),
        Action::Update => {
            require(
                actor.role.is_manager_class(),
                "manager privileges are required to update a department",
            )?;
            if actor.role.is_hr_class() {
                return Ok(());
            }
            let dept = target.and_then(|t| t.department_id);
            require(
                dept.is_some() && dept == actor.home_department(),
                "managers may only update their own department",
            )
        }
    }
}

fn authorize_employee(actor: &Actor, action: Action, target: Option<&Target>) -> HrResult<()> {
    require(
        actor.role.is_manager_class(),
        "manager privileges are required to manage employee records",
    )?;

    if action == Action::Create && !actor.role.is_hr_class() {
        // A department manager provisions rank-and-file staff only; peer
        // managers are created by HR or the super admin.
        let new_role = target.and_then(|t| t.employee_role).unwrap_or(Role::Employee);
        require(
            new_role == Role::Employee,
            "managers may only create employee-role records",
        )?;
    }

    if action != Action::Create {
        authorize_department_scoped(actor, target)?;
    }

    if action == Action::Update && !actor.role.is_hr_class() {
        // Role escalation and leadership assignment mirror the creation
        // rule: a department manager cannot mint peers, on update any more
        // than on create, and cannot hand out another department's
        // leadership.
        if let Some(new_role) = target.and_then(|t| t.new_role) {
            require(
                !new_role.is_manager_class(),
                "managers may only assign the employee role",
            )?;
        }
        if let Some(dept) = target.and_then(|t| t.lead_department_id) {
            require(
                Some(dept) == actor.home_department(),
                "department leadership is assigned by its own manager or HR",
            )?;
        }
    }

    Ok(())
}

/// Manager-class actors may touch records of their own department;
/// HR-class actors are unrestricted.
fn authorize_department_scoped(actor: &Actor, target: Option<&Target>) -> HrResult<()> {
    require(
        actor.role.is_manager_class(),
        "manager privileges are required",
    )?;
    if actor.role.is_hr_class() {
        return Ok(());
    }
    let dept = target.and_then(|t| t.department_id);
    require(
        dept.is_some() && dept == actor.home_department(),
        "record belongs to another department",
    )
}

fn authorize_attendance(actor: &Actor, target: Option<&Target>) -> HrResult<()> {
    // Self check-in is always allowed; recording for others takes
    // manager privileges over the employee's department.
    if target.and_then(|t| t.employee_id) == Some(actor.employee_id) {
        return Ok(());
    }
    authorize_department_scoped(actor, target)
}

fn authorize_enrollment(actor: &Actor, target: Option<&Target>) -> HrResult<()> {
    if target.and_then(|t| t.employee_id) == Some(actor.employee_id) {
        return Ok(());
    }
    require(
        actor.role.is_hr_class(),
        "HR privileges are required to enroll other employees",
    )
}

fn authorize_own_record(actor: &Actor, target: Option<&Target>) -> HrResult<()> {
    if target.and_then(|t| t.employee_id) == Some(actor.employee_id) {
        return Ok(());
    }
    authorize_department_scoped(actor, target)
}

fn require(condition: bool, message: &str) -> HrResult<()> {
    if condition {
        Ok(())
    } else {
        Err(HrError::Authorization(message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, department_id: Option<Uuid>) -> Actor {
        Actor {
            account_id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            role,
            department_id,
            led_department_id: None,
        }
    }

    #[test]
    fn test_hr_and_admin_see_everything() {
        let hr = actor(Role::Hr, None);
        let admin = actor(Role::SuperAdmin, None);
        for resource in [Resource::Employee, Resource::Leave, Resource::Payslip] {
            assert_eq!(visible_scope(&hr, resource), Scope::All);
            assert_eq!(visible_scope(&admin, resource), Scope::All);
        }
    }

    #[test]
    fn test_manager_scope_is_own_department() {
        let dept = Uuid::new_v4();
        let manager = actor(Role::Manager, Some(dept));
        assert_eq!(
            visible_scope(&manager, Resource::Employee),
            Scope::Department(dept)
        );
        assert_eq!(
            visible_scope(&manager, Resource::Leave),
            Scope::Department(dept)
        );
    }

    #[test]
    fn test_manager_without_department_sees_nothing() {
        let manager = actor(Role::Manager, None);
        assert_eq!(visible_scope(&manager, Resource::Employee), Scope::Nothing);
    }

    #[test]
    fn test_manager_leading_a_department_uses_it() {
        let led = Uuid::new_v4();
        let mut manager = actor(Role::Manager, None);
        manager.led_department_id = Some(led);
        assert_eq!(
            visible_scope(&manager, Resource::Employee),
            Scope::Department(led)
        );
    }

    #[test]
    fn test_employee_sees_department_colleagues_but_own_leave_only() {
        let dept = Uuid::new_v4();
        let employee = actor(Role::Employee, Some(dept));
        assert_eq!(
            visible_scope(&employee, Resource::Employee),
            Scope::OwnAndDepartment {
                employee_id: employee.employee_id,
                department_id: Some(dept),
            }
        );
        assert_eq!(
            visible_scope(&employee, Resource::Leave),
            Scope::Own(employee.employee_id)
        );
        assert_eq!(
            visible_scope(&employee, Resource::Attendance),
            Scope::Own(employee.employee_id)
        );
    }

    #[test]
    fn test_scope_permits_distinguishes_department() {
        let dept = Uuid::new_v4();
        let other_dept = Uuid::new_v4();
        let scope = Scope::Department(dept);
        assert!(scope_permits(scope, None, Some(dept)));
        assert!(!scope_permits(scope, None, Some(other_dept)));
        assert!(!scope_permits(scope, None, None));
    }

    #[test]
    fn test_scope_permits_own_and_department() {
        let dept = Uuid::new_v4();
        let me = Uuid::new_v4();
        let colleague = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let scope = Scope::OwnAndDepartment {
            employee_id: me,
            department_id: Some(dept),
        };
        assert!(scope_permits(scope, Some(me), None));
        assert!(scope_permits(scope, Some(colleague), Some(dept)));
        assert!(!scope_permits(scope, Some(stranger), Some(Uuid::new_v4())));
    }

    #[test]
    fn test_empty_scope_permits_nothing() {
        assert!(!scope_permits(Scope::Nothing, Some(Uuid::new_v4()), None));
    }

    #[test]
    fn test_department_create_is_super_admin_only() {
        assert!(authorize(
            &actor(Role::SuperAdmin, None),
            Action::Create,
            Resource::Department,
            None
        )
        .is_ok());
        for role in [Role::Hr, Role::Manager, Role::Employee] {
            assert!(matches!(
                authorize(&actor(role, None), Action::Create, Resource::Department, None),
                Err(HrError::Authorization(_))
            ));
        }
    }

    #[test]
    fn test_department_update_restricted_to_own_department() {
        let dept = Uuid::new_v4();
        let manager = actor(Role::Manager, Some(dept));
        let own = Target::department(Some(dept));
        let foreign = Target::department(Some(Uuid::new_v4()));
        assert!(
            authorize(&manager, Action::Update, Resource::Department, Some(&own)).is_ok()
        );
        assert!(matches!(
            authorize(&manager, Action::Update, Resource::Department, Some(&foreign)),
            Err(HrError::Authorization(_))
        ));
        // HR is unrestricted.
        assert!(authorize(
            &actor(Role::Hr, None),
            Action::Update,
            Resource::Department,
            Some(&foreign)
        )
        .is_ok());
    }

    #[test]
    fn test_manager_cannot_create_peer_managers() {
        let dept = Uuid::new_v4();
        let manager = actor(Role::Manager, Some(dept));
        let peer = Target::employee(Uuid::new_v4(), Role::Manager, Some(dept));
        let staff = Target::employee(Uuid::new_v4(), Role::Employee, Some(dept));
        assert!(matches!(
            authorize(&manager, Action::Create, Resource::Employee, Some(&peer)),
            Err(HrError::Authorization(_))
        ));
        assert!(
            authorize(&manager, Action::Create, Resource::Employee, Some(&staff)).is_ok()
        );
        // HR may create managers.
        assert!(
            authorize(&actor(Role::Hr, None), Action::Create, Resource::Employee, Some(&peer))
                .is_ok()
        );
    }

    #[test]
    fn test_manager_cannot_promote_subordinate_to_peer() {
        let dept = Uuid::new_v4();
        let manager = actor(Role::Manager, Some(dept));
        let mut target = Target::employee(Uuid::new_v4(), Role::Employee, Some(dept));
        target.new_role = Some(Role::Manager);
        assert!(matches!(
            authorize(&manager, Action::Update, Resource::Employee, Some(&target)),
            Err(HrError::Authorization(_))
        ));
        // HR may promote.
        assert!(
            authorize(&actor(Role::Hr, None), Action::Update, Resource::Employee, Some(&target))
                .is_ok()
        );
    }

    #[test]
    fn test_manager_cannot_assign_foreign_department_leadership() {
        let dept = Uuid::new_v4();
        let manager = actor(Role::Manager, Some(dept));
        let mut target = Target::employee(Uuid::new_v4(), Role::Manager, Some(dept));
        target.lead_department_id = Some(Uuid::new_v4());
        assert!(matches!(
            authorize(&manager, Action::Update, Resource::Employee, Some(&target)),
            Err(HrError::Authorization(_))
        ));

        // Leadership of the manager's own department is theirs to assign.
        target.lead_department_id = Some(dept);
        assert!(
            authorize(&manager, Action::Update, Resource::Employee, Some(&target)).is_ok()
        );
    }

    #[test]
    fn test_manager_cannot_edit_foreign_department_employee() {
        let manager = actor(Role::Manager, Some(Uuid::new_v4()));
        let foreign = Target::employee(Uuid::new_v4(), Role::Employee, Some(Uuid::new_v4()));
        for action in [Action::Update, Action::Delete] {
            assert!(matches!(
                authorize(&manager, action, Resource::Employee, Some(&foreign)),
                Err(HrError::Authorization(_))
            ));
        }
    }

    #[test]
    fn test_employee_cannot_mutate_records() {
        let employee = actor(Role::Employee, Some(Uuid::new_v4()));
        assert!(matches!(
            authorize(&employee, Action::Create, Resource::Position, None),
            Err(HrError::Authorization(_))
        ));
        assert!(matches!(
            authorize(&employee, Action::Create, Resource::Payslip, None),
            Err(HrError::Authorization(_))
        ));
        assert!(matches!(
            authorize(&employee, Action::Update, Resource::Employee, None),
            Err(HrError::Authorization(_))
        ));
    }

    #[test]
    fn test_payroll_and_policies_require_hr() {
        let dept = Uuid::new_v4();
        let manager = actor(Role::Manager, Some(dept));
        for resource in [Resource::Payslip, Resource::ContractType, Resource::Position] {
            assert!(matches!(
                authorize(&manager, Action::Create, resource, None),
                Err(HrError::Authorization(_))
            ));
            assert!(authorize(&actor(Role::Hr, None), Action::Create, resource, None).is_ok());
        }
    }

    #[test]
    fn test_self_check_in_is_allowed() {
        let employee = actor(Role::Employee, Some(Uuid::new_v4()));
        let own = Target::employee(employee.employee_id, Role::Employee, employee.department_id);
        assert!(
            authorize(&employee, Action::Create, Resource::Attendance, Some(&own)).is_ok()
        );
        let other = Target::employee(Uuid::new_v4(), Role::Employee, employee.department_id);
        assert!(matches!(
            authorize(&employee, Action::Create, Resource::Attendance, Some(&other)),
            Err(HrError::Authorization(_))
        ));
    }
}
