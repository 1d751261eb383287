use crate::types::{Principal, Role};
use uuid::Uuid;

/// A declared requirement for one operation: a set of acceptable roles, an
/// ownership escape hatch, or both. Declared statically by the routing
/// layer next to each handler.
#[derive(Debug, Clone, Copy)]
pub struct AccessRule {
    required_roles: &'static [Role],
    allow_self: bool,
}

impl AccessRule {
    /// Allow only callers whose role is in `required`.
    pub const fn roles(required: &'static [Role]) -> Self {
        Self {
            required_roles: required,
            allow_self: false,
        }
    }

    /// Allow callers whose role is in `required`, or the owner of the
    /// targeted resource.
    pub const fn roles_or_self(required: &'static [Role]) -> Self {
        Self {
            required_roles: required,
            allow_self: true,
        }
    }

    /// Allow only the owner of the targeted resource.
    pub const fn self_only() -> Self {
        Self {
            required_roles: &[],
            allow_self: true,
        }
    }
}

/// Outcome of an access evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Decides whether `principal` may perform the operation guarded by `rule`
/// against a resource owned by `target_owner`.
///
/// Deny is the default. Role membership is an exact match on the closed
/// enum; there is no hierarchy, each operation declares its acceptable set
/// explicitly. Pure: same inputs, same decision, no I/O and no clock.
pub fn evaluate(principal: &Principal, rule: &AccessRule, target_owner: Option<Uuid>) -> Decision {
    if rule.required_roles.contains(&principal.role) {
        return Decision::Allow;
    }

    if rule.allow_self {
        if let Some(owner) = target_owner {
            if owner == principal.id {
                return Decision::Allow;
            }
        }
    }

    Decision::Deny
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn principal(role: Role) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            role,
        }
    }

    #[rstest]
    #[case(Role::Admin, Decision::Allow)]
    #[case(Role::User, Decision::Deny)]
    #[case(Role::Professional, Decision::Deny)]
    fn admin_rule_is_exact_membership(#[case] role: Role, #[case] expected: Decision) {
        static RULE: AccessRule = AccessRule::roles(&[Role::Admin]);

        // Target is irrelevant when the rule has no self clause.
        let decision = evaluate(&principal(role), &RULE, Some(Uuid::new_v4()));

        assert_eq!(decision, expected);
    }

    #[test]
    fn admin_allowed_regardless_of_target() {
        static RULE: AccessRule = AccessRule::roles(&[Role::Admin]);
        let admin = principal(Role::Admin);

        assert_eq!(evaluate(&admin, &RULE, None), Decision::Allow);
        assert_eq!(evaluate(&admin, &RULE, Some(admin.id)), Decision::Allow);
        assert_eq!(
            evaluate(&admin, &RULE, Some(Uuid::new_v4())),
            Decision::Allow
        );
    }

    #[test]
    fn self_rule_allows_owner_only() {
        static RULE: AccessRule = AccessRule::self_only();
        let user = principal(Role::User);

        assert_eq!(evaluate(&user, &RULE, Some(user.id)), Decision::Allow);
        assert_eq!(
            evaluate(&user, &RULE, Some(Uuid::new_v4())),
            Decision::Deny
        );
    }

    #[test]
    fn self_rule_without_target_denies() {
        static RULE: AccessRule = AccessRule::self_only();
        let user = principal(Role::User);

        assert_eq!(evaluate(&user, &RULE, None), Decision::Deny);
    }

    #[test]
    fn empty_rule_denies_everyone() {
        static RULE: AccessRule = AccessRule::roles(&[]);

        for role in [Role::Admin, Role::User, Role::Professional] {
            let p = principal(role);
            assert_eq!(evaluate(&p, &RULE, Some(p.id)), Decision::Deny);
        }
    }

    #[rstest]
    #[case(Role::Admin, false, Decision::Allow)]
    #[case(Role::User, true, Decision::Allow)]
    #[case(Role::User, false, Decision::Deny)]
    #[case(Role::Professional, false, Decision::Deny)]
    fn role_or_self_disjunction(
        #[case] role: Role,
        #[case] targets_self: bool,
        #[case] expected: Decision,
    ) {
        static RULE: AccessRule = AccessRule::roles_or_self(&[Role::Admin]);
        let p = principal(role);

        let target = if targets_self { p.id } else { Uuid::new_v4() };

        assert_eq!(evaluate(&p, &RULE, Some(target)), expected);
    }
}
