use projovo_core::{Entity, LogicalId};
use projovo_stack::builder::{
    CLIENT_LOGICAL_ID, DIRECTORY_LOGICAL_ID, EXCHANGE_LOGICAL_ID,
};
use projovo_stack::outputs::{
    IDENTITY_POOL_ID, USER_POOL_CLIENT_ID, USER_POOL_ID, USER_POOL_REGION,
};
use projovo_stack::{
    BuildError, Deferred, GraphError, InMemoryProvisioner, ProvisioningError, Provisioner,
    Realization, RemovalPolicy, ResourceGraph, ResourceKind, StackConfig, Teardown, build,
    render_template, resolve_outputs,
};

fn id(s: &str) -> LogicalId {
    LogicalId::new(s.to_string()).unwrap()
}

/// A provider that always fails, to check errors are surfaced unchanged.
struct FailingProvisioner;

impl Provisioner for FailingProvisioner {
    fn apply(&self, _graph: &ResourceGraph) -> Result<Realization, ProvisioningError> {
        Err(ProvisioningError::Provider("LimitExceededException".to_string()))
    }

    fn destroy(&self, _graph: &ResourceGraph) -> Result<Teardown, ProvisioningError> {
        Err(ProvisioningError::Provider("AccessDenied".to_string()))
    }
}

#[test]
fn build_apply_resolve_destroy() {
    projovo_observability::init();

    let graph = build(&StackConfig::default()).expect("default config builds");
    let provisioner = InMemoryProvisioner::new("eu-west-1");

    let realization = provisioner.apply(&graph).expect("apply succeeds");
    let outputs = resolve_outputs(&graph, &realization).expect("outputs resolve");

    assert_eq!(outputs.len(), 4);
    assert_eq!(outputs[USER_POOL_REGION], "eu-west-1");
    assert_eq!(
        outputs[USER_POOL_ID],
        realization.physical_id(&id(DIRECTORY_LOGICAL_ID)).unwrap().as_str()
    );
    assert_eq!(
        outputs[USER_POOL_CLIENT_ID],
        realization.physical_id(&id(CLIENT_LOGICAL_ID)).unwrap().as_str()
    );
    assert!(outputs[IDENTITY_POOL_ID].starts_with("eu-west-1:"));

    let teardown = provisioner.destroy(&graph).expect("destroy succeeds");
    assert_eq!(teardown.destroyed.len(), 6);
    assert!(teardown.retained.is_empty());

    // with everything gone, the same stack can be applied again
    assert!(provisioner.apply(&graph).is_ok());
}

#[test]
fn outputs_cannot_be_resolved_before_realization() {
    let graph = build(&StackConfig::default()).unwrap();
    let empty = Realization::new(graph.stack_name(), "eu-west-1", Default::default());

    let err = resolve_outputs(&graph, &empty).unwrap_err();
    assert_eq!(err, ProvisioningError::NotRealized(id(DIRECTORY_LOGICAL_ID)));
}

#[test]
fn retained_directory_survives_teardown() {
    let config = StackConfig {
        removal_policy: RemovalPolicy::Retain,
        ..StackConfig::default()
    };
    let graph = build(&config).unwrap();
    let provisioner = InMemoryProvisioner::new("us-east-1");
    provisioner.apply(&graph).unwrap();

    let teardown = provisioner.destroy(&graph).unwrap();
    assert_eq!(teardown.retained, vec![id(DIRECTORY_LOGICAL_ID)]);
    assert_eq!(teardown.destroyed.len(), 5);
    assert!(teardown.destroyed.contains(&id(CLIENT_LOGICAL_ID)));
    assert!(teardown.destroyed.contains(&id(EXCHANGE_LOGICAL_ID)));
    assert!(teardown.destroyed.contains(&id("Group-client-member")));

    assert_eq!(
        provisioner.retained_directories().unwrap(),
        vec![config.directory_name.clone()]
    );

    // the retained directory still holds its name
    let err = provisioner.apply(&graph).unwrap_err();
    assert!(matches!(err, ProvisioningError::NameConflict { name, .. } if name == config.directory_name));
}

#[test]
fn name_collisions_surface_at_apply_not_build() {
    let first = StackConfig::default();
    let second = StackConfig {
        stack_name: "AnotherAuthStack".to_string(),
        ..StackConfig::default()
    };

    // both graphs are valid on their own
    let first_graph = build(&first).unwrap();
    let second_graph = build(&second).unwrap();

    let provisioner = InMemoryProvisioner::new("eu-central-1");
    provisioner.apply(&first_graph).unwrap();
    assert!(matches!(
        provisioner.apply(&second_graph),
        Err(ProvisioningError::NameConflict { .. })
    ));
}

#[test]
fn provider_failures_pass_through_unchanged() {
    let graph = build(&StackConfig::default()).unwrap();
    assert_eq!(
        FailingProvisioner.apply(&graph).unwrap_err(),
        ProvisioningError::Provider("LimitExceededException".to_string())
    );
    assert_eq!(
        FailingProvisioner.destroy(&graph).unwrap_err(),
        ProvisioningError::Provider("AccessDenied".to_string())
    );
}

#[test]
fn hidden_exchange_output_is_not_resolved() {
    let config = StackConfig {
        expose_exchange_output: false,
        ..StackConfig::default()
    };
    let graph = build(&config).unwrap();
    let realization = InMemoryProvisioner::new("eu-west-1").apply(&graph).unwrap();
    let outputs = resolve_outputs(&graph, &realization).unwrap();

    assert!(!outputs.contains_key(IDENTITY_POOL_ID));
    assert!(render_template(&graph)["Outputs"].get(IDENTITY_POOL_ID).is_none());
}

#[test]
fn graph_shape_for_the_three_roles() {
    let graph = build(&StackConfig::default()).unwrap();
    let directory = graph.directory_node().unwrap();

    assert_eq!(graph.nodes_of(ResourceKind::Group).count(), 3);
    for node in graph.nodes().iter().filter(|n| n.kind() != ResourceKind::Directory) {
        assert_eq!(graph.dependencies_of(node.id()), vec![directory.id()]);
    }

    let order = graph.topological_order().unwrap();
    assert_eq!(order[0], directory.id());

    let bindings: Vec<(&str, &Deferred)> = graph
        .outputs()
        .iter()
        .map(|b| (b.name.as_str(), &b.value))
        .collect();
    assert!(bindings.contains(&(USER_POOL_REGION, &Deferred::Region)));
}

#[test]
fn construction_errors_return_no_graph() {
    let config = StackConfig {
        group_names: vec!["admin".to_string(), "admin".to_string()],
        ..StackConfig::default()
    };
    assert!(matches!(build(&config), Err(BuildError::DuplicateGroup(name)) if name == "admin"));

    let config = StackConfig {
        directory_name: String::new(),
        ..StackConfig::default()
    };
    assert!(matches!(build(&config), Err(BuildError::InvalidConfig(_))));

    // the graph error type is reachable from the public API for custom graphs
    let err: BuildError = GraphError::DuplicateOutput("UserPoolId".to_string()).into();
    assert!(err.to_string().contains("UserPoolId"));
}
