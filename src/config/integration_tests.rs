#[cfg(test)]
mod integration_tests {
    use serde_json::json;
    use std::sync::Arc;

    use crate::config::{load_and_validate_config, Config, RuntimeBuilder};
    use crate::dispatch::DispatchOrder;
    use crate::engine::RunStatus;
    use crate::errors::ConfigError;
    use crate::graph::{AccessLevel, Archetype, GrantTable};

    /// Test that the shipped scenario files load and validate
    #[test]
    fn test_scenario_yaml_loading() {
        for path in [
            "configs/linear-walk.yaml",
            "configs/find-b.yaml",
            "configs/friends.yaml",
            "configs/visit-counter.yaml",
        ] {
            let config = load_and_validate_config(path)
                .unwrap_or_else(|e| panic!("{} failed to load: {}", path, e));
            assert!(config.spawn.is_some(), "{} has no spawn section", path);
        }

        let config = load_and_validate_config("configs/visit-counter.yaml").unwrap();
        assert_eq!(config.engine.dispatch_order, DispatchOrder::WalkerFirst);
        assert_eq!(config.engine.max_steps, Some(100));
        assert_eq!(config.walkers[0].fields.get("rooms"), Some(&json!(0)));
    }

    #[tokio::test]
    async fn test_linear_walk_reports_in_visit_order() {
        let config = load_and_validate_config("configs/linear-walk.yaml").unwrap();
        let runtime = RuntimeBuilder::from_config(&config).unwrap();

        let result = runtime.run_spawn().await.unwrap().unwrap();

        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(result.reports.as_slice(), &[json!("a"), json!("b"), json!("c")]);
        assert_eq!(result.steps, 4);
    }

    #[tokio::test]
    async fn test_find_b_disengages() {
        let config = load_and_validate_config("configs/find-b.yaml").unwrap();
        let runtime = RuntimeBuilder::from_config(&config).unwrap();

        let result = runtime.run_spawn().await.unwrap().unwrap();

        assert_eq!(result.status, RunStatus::Disengaged);
        assert_eq!(result.reports.as_slice(), &[json!("b")]);
    }

    #[tokio::test]
    async fn test_friends_filters_by_edge_type_and_age() {
        let config = load_and_validate_config("configs/friends.yaml").unwrap();
        let runtime = RuntimeBuilder::from_config(&config).unwrap();

        let result = runtime.run_spawn().await.unwrap().unwrap();

        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(result.reports.as_slice(), &[json!("bob")]);
    }

    #[tokio::test]
    async fn test_visit_counter_updates_graph_and_fields() {
        let config = load_and_validate_config("configs/visit-counter.yaml").unwrap();
        let runtime = RuntimeBuilder::from_config(&config).unwrap();
        assert_eq!(runtime.context.tenant(), "museum");

        let result = runtime.run_spawn().await.unwrap().unwrap();

        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(result.reports.as_slice(), &[json!(4)]);
        assert_eq!(result.final_fields.get("rooms"), Some(&json!(4)));

        let graph = runtime.scheduler.graph();
        for key in ["a", "b", "c"] {
            let room = graph.get_node(runtime.node(key).unwrap()).unwrap();
            assert_eq!(room.property("visitors"), Some(&json!(1)), "room {}", key);
        }
    }

    #[tokio::test]
    async fn test_runtime_with_gate_hides_unreadable_nodes() {
        let config = load_and_validate_config("configs/linear-walk.yaml").unwrap();
        let gate = Arc::new(GrantTable::new(AccessLevel::Read));
        let runtime = RuntimeBuilder::from_config_with_gate(&config, gate.clone()).unwrap();
        gate.grant(runtime.context.actor(), runtime.node("b").unwrap(), AccessLevel::None);

        let result = runtime.run_spawn().await.unwrap().unwrap();

        // b is invisible, so the walk never gets past a
        assert_eq!(result.reports.as_slice(), &[json!("a")]);
    }

    #[test]
    fn test_unknown_ability_is_rejected() {
        let config: Config = serde_yaml::from_str(
            r#"
walkers:
  - type: Visitor
    abilities:
      - ability: teleport
"#,
        )
        .unwrap();

        let result = RuntimeBuilder::from_config(&config);
        assert!(matches!(result, Err(ConfigError::UnknownAbility(name)) if name == "teleport"));
    }

    #[test]
    fn test_bad_ability_options_are_rejected() {
        let config: Config = serde_yaml::from_str(
            r#"
locations:
  - type: Person
    ability: increment_property
    options: { by: 2 }
"#,
        )
        .unwrap();

        let result = RuntimeBuilder::from_config(&config);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidOptions { ability, .. }) if ability == "increment_property"
        ));
    }
}
