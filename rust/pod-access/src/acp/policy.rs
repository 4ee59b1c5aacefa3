use std::collections::BTreeSet;

use pod_common::Iri;
use pod_common::vocab::{acp, rdf};
use pod_dataset::{Dataset, Thing};

use crate::AccessMap;

/// Whether access applies to a resource itself or to the members of a
/// container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Resource,
    Members,
}

impl Scope {
    /// The ACR predicate linking the access controls of this scope
    pub(crate) fn access_control_predicate(self) -> &'static str {
        match self {
            Scope::Resource => acp::ACCESS_CONTROL,
            Scope::Members => acp::MEMBER_ACCESS_CONTROL,
        }
    }

    /// Fragment of the access control this crate maintains in the ACR
    pub(crate) fn managed_control(self) -> &'static str {
        match self {
            Scope::Resource => "managed-access",
            Scope::Members => "managed-member-access",
        }
    }

    fn policy_fragment(self, access: &AccessMap) -> String {
        match self {
            Scope::Resource => access.name(),
            Scope::Members => format!("default-{}", access.name()),
        }
    }

    fn owns(self, fragment: &str) -> bool {
        fragment.starts_with("default-") == (self == Scope::Members)
    }
}

/// Who a policy applies to, and what it allows and denies them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PolicyGrant {
    pub(crate) agents: BTreeSet<String>,
    pub(crate) allow: AccessMap,
    pub(crate) deny: AccessMap,
}

/// Work out the agents `policy` matches: those matched by every `allOf`
/// matcher and by at least one `anyOf` matcher, minus those matched by a
/// `noneOf` matcher. Matchers not described in `dataset` match nobody.
pub(crate) fn evaluate(dataset: &Dataset, policy: &Thing) -> PolicyGrant {
    let matched_by = |predicate: &str| -> Vec<BTreeSet<String>> {
        policy
            .iris(predicate)
            .map(|matcher| {
                dataset
                    .thing(matcher)
                    .map(|matcher| {
                        matcher
                            .iris(acp::AGENT)
                            .map(str::to_string)
                            .collect::<BTreeSet<_>>()
                    })
                    .unwrap_or_default()
            })
            .collect()
    };

    let all_of = matched_by(acp::ALL_OF);
    let any_of = matched_by(acp::ANY_OF);

    let mut agents = match (all_of.split_first(), any_of.is_empty()) {
        (None, true) => BTreeSet::new(),
        (None, false) => any_of.into_iter().flatten().collect(),
        (Some((first, rest)), only_all_of) => {
            let mut agents = first.clone();
            for matcher in rest {
                agents.retain(|agent| matcher.contains(agent));
            }
            if !only_all_of {
                agents.retain(|agent| any_of.iter().any(|matcher| matcher.contains(agent)));
            }
            agents
        }
    };

    for excluded in matched_by(acp::NONE_OF) {
        agents.retain(|agent| !excluded.contains(agent));
    }

    PolicyGrant {
        agents,
        allow: AccessMap::from_modes(policy.iris(acp::ALLOW)),
        deny: AccessMap::from_modes(policy.iris(acp::DENY)),
    }
}

/// The policies of `scope` this crate maintains in the policy document
fn managed_policies(document: &Dataset, document_iri: &Iri, scope: Scope) -> Vec<String> {
    let prefix = format!("{document_iri}#");
    document
        .things_of_type(acp::POLICY)
        .filter(|policy| {
            policy
                .iri()
                .strip_prefix(prefix.as_str())
                .is_some_and(|fragment| scope.owns(fragment))
        })
        .map(|policy| policy.iri().to_string())
        .collect()
}

fn matchers_of(document: &Dataset, policy: &str) -> Vec<String> {
    document
        .thing(policy)
        .map(|policy| policy.iris(acp::ANY_OF).map(str::to_string).collect())
        .unwrap_or_default()
}

/// Stop matching `agent` in every managed policy of `scope`
pub(crate) fn remove_agent(document: &mut Dataset, document_iri: &Iri, scope: Scope, agent: &str) {
    for policy in managed_policies(document, document_iri, scope) {
        for matcher in matchers_of(document, &policy) {
            if let Some(matcher) = document.thing_mut(&matcher) {
                matcher.remove_iri(acp::AGENT, agent);
            }
        }
    }
}

/// Match `agent` in the managed policy of `scope` allowing exactly `access`,
/// creating the policy and its matcher when needed
pub(crate) fn add_agent(
    document: &mut Dataset,
    document_iri: &Iri,
    scope: Scope,
    access: &AccessMap,
    agent: &str,
) {
    let policy_iri = document_iri
        .with_fragment(&scope.policy_fragment(access))
        .to_string();
    let matcher_iri = format!("{policy_iri}-matcher");

    let policy = document.thing_or_insert(&policy_iri);
    policy.set_iris(rdf::TYPE, [acp::POLICY]);
    policy.set_iris(acp::ALLOW, access.modes());
    policy.set_iris(acp::ANY_OF, [matcher_iri.as_str()]);

    let matcher = document.thing_or_insert(&matcher_iri);
    matcher.add_iri(rdf::TYPE, acp::MATCHER);
    matcher.add_iri(acp::AGENT, agent);
}

/// Drop the managed policies of `scope` that match nobody, along with their
/// matchers. Returns the policies that remain.
pub(crate) fn prune(document: &mut Dataset, document_iri: &Iri, scope: Scope) -> Vec<String> {
    let mut surviving = Vec::new();

    for policy in managed_policies(document, document_iri, scope) {
        let matchers = matchers_of(document, &policy);
        let matches_someone = matchers.iter().any(|matcher| {
            document
                .thing(matcher)
                .is_some_and(|matcher| matcher.iris(acp::AGENT).next().is_some())
        });

        if matches_someone {
            surviving.push(policy);
        } else {
            document.remove_thing(&policy);
            for matcher in matchers {
                document.remove_thing(&matcher);
            }
        }
    }

    surviving
}
