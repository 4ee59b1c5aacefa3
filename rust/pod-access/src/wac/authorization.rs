use pod_common::Iri;
use pod_common::vocab::{acl, foaf, rdf};
use pod_dataset::{Dataset, Thing};
use pod_fetch::ResourceInfo;
use tracing::debug;
use ulid::Ulid;

use crate::AccessMap;

/// The modes each agent (or agent class) holds on `resource`
pub(super) fn agent_access(dataset: &Dataset, resource: &str) -> Vec<(String, AccessMap)> {
    dataset
        .things_of_type(acl::AUTHORIZATION)
        .filter(|authorization| authorization.has_iri(acl::ACCESS_TO, resource))
        .flat_map(|authorization| {
            let access = AccessMap::from_modes(authorization.iris(acl::MODE));
            authorization
                .iris(acl::AGENT)
                .chain(authorization.iris(acl::AGENT_CLASS))
                .map(move |agent| (agent.to_string(), access))
        })
        .collect()
}

/// Take `agent` out of every authorization giving it access to `resource`.
///
/// Whatever else such an authorization grants the agent (inherited access
/// through `acl:default`, access to other resources) moves to a new
/// authorization, and authorizations left without anyone to authorize are
/// dropped.
pub(super) fn revoke(dataset: &mut Dataset, acl_iri: &Iri, resource: &str, agent: &str) {
    let predicate = agent_predicate(agent);
    let affected: Vec<Thing> = dataset
        .things_of_type(acl::AUTHORIZATION)
        .filter(|authorization| {
            authorization.has_iri(acl::ACCESS_TO, resource)
                && authorization.has_iri(predicate, agent)
        })
        .cloned()
        .collect();

    for mut authorization in affected {
        let mut remainder = copy_as(&authorization, fresh_subject(acl_iri));
        remainder.remove_iri(acl::ACCESS_TO, resource);
        remainder.remove_all(acl::AGENT);
        remainder.remove_all(acl::AGENT_CLASS);
        remainder.remove_all(acl::AGENT_GROUP);
        remainder.add_iri(predicate, agent);
        if !remainder.values(acl::ACCESS_TO).is_empty() || !remainder.values(acl::DEFAULT).is_empty()
        {
            debug!(
                "Keeping the rest of {} for {} as {}",
                authorization.iri(),
                agent,
                remainder.iri()
            );
            dataset.set_thing(remainder);
        }

        authorization.remove_iri(predicate, agent);
        if authorizes_nobody(&authorization) {
            dataset.remove_thing(authorization.iri());
        } else {
            dataset.set_thing(authorization);
        }
    }
}

/// Add an authorization giving `agent` exactly `access` to `resource`
pub(super) fn grant(
    dataset: &mut Dataset,
    acl_iri: &Iri,
    resource: &str,
    agent: &str,
    access: &AccessMap,
) {
    let mut authorization = Thing::new(fresh_subject(acl_iri))
        .with_iri(rdf::TYPE, acl::AUTHORIZATION)
        .with_iri(acl::ACCESS_TO, resource)
        .with_iri(agent_predicate(agent), agent);
    for mode in access.modes() {
        authorization.add_iri(acl::MODE, mode);
    }

    dataset.set_thing(authorization);
}

/// A new ACL for `resource` holding the authorizations `ancestor` applies by
/// default to the members of `container`
pub(super) fn inherit(
    ancestor: &Dataset,
    container: &Iri,
    acl_iri: &Iri,
    resource: &ResourceInfo,
) -> Dataset {
    let mut dataset = Dataset::new();

    for authorization in ancestor
        .things_of_type(acl::AUTHORIZATION)
        .filter(|authorization| authorization.has_iri(acl::DEFAULT, container.as_str()))
    {
        let mut copy = copy_as(authorization, fresh_subject(acl_iri));
        copy.remove_all(acl::ACCESS_TO);
        copy.remove_all(acl::DEFAULT);
        copy.add_iri(acl::ACCESS_TO, resource.iri.as_str());
        if resource.is_container {
            copy.add_iri(acl::DEFAULT, resource.iri.as_str());
        }
        dataset.set_thing(copy);
    }

    dataset
}

/// Public and authenticated access are granted to agent classes
fn agent_predicate(agent: &str) -> &'static str {
    match agent {
        foaf::AGENT | acl::AUTHENTICATED_AGENT => acl::AGENT_CLASS,
        _ => acl::AGENT,
    }
}

fn authorizes_nobody(authorization: &Thing) -> bool {
    [acl::AGENT, acl::AGENT_CLASS, acl::AGENT_GROUP]
        .iter()
        .all(|predicate| authorization.values(predicate).is_empty())
}

fn fresh_subject(acl_iri: &Iri) -> String {
    acl_iri
        .with_fragment(&Ulid::new().to_string().to_lowercase())
        .to_string()
}

fn copy_as(thing: &Thing, iri: String) -> Thing {
    let mut copy = Thing::new(iri);
    for predicate in thing.predicates() {
        for object in thing.values(predicate) {
            copy.add(predicate, object.clone());
        }
    }
    copy
}
