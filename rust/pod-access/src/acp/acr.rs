use std::collections::BTreeSet;

use pod_common::Iri;
use pod_common::vocab::{acp, rdf};
use pod_dataset::Dataset;

use super::policy::Scope;

/// Every policy applied through the access controls `predicate` links to
pub(crate) fn applied_policies(acr: &Dataset, predicate: &str) -> BTreeSet<String> {
    acr.things()
        .flat_map(|thing| thing.iris(predicate))
        .filter_map(|control| acr.thing(control))
        .flat_map(|control| control.iris(acp::APPLY))
        .map(str::to_string)
        .collect()
}

/// Make the managed access control of `scope` apply exactly `policies`.
///
/// Access controls this crate does not manage are left alone. With no
/// policies left, the managed access control is removed.
pub(crate) fn apply_managed(
    acr: &mut Dataset,
    acr_iri: &Iri,
    resource: &Iri,
    scope: Scope,
    policies: &[String],
) {
    let subject = acr
        .things_of_type(acp::ACCESS_CONTROL_RESOURCE)
        .next()
        .map(|thing| thing.iri().to_string())
        .unwrap_or_else(|| acr_iri.to_string());
    let control_iri = acr_iri.with_fragment(scope.managed_control()).to_string();
    let predicate = scope.access_control_predicate();

    if policies.is_empty() {
        acr.remove_thing(&control_iri);
        if let Some(subject) = acr.thing_mut(&subject) {
            subject.remove_iri(predicate, &control_iri);
        }
        return;
    }

    let subject = acr.thing_or_insert(&subject);
    subject.add_iri(rdf::TYPE, acp::ACCESS_CONTROL_RESOURCE);
    subject.add_iri(acp::RESOURCE, resource.as_str());
    subject.add_iri(predicate, control_iri.as_str());

    let control = acr.thing_or_insert(&control_iri);
    control.set_iris(rdf::TYPE, [acp::ACCESS_CONTROL_CLASS]);
    control.set_iris(acp::APPLY, policies.iter().map(String::as_str));
}
