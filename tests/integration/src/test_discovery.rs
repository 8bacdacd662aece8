//! Discovery through the controller surface.

#[cfg(test)]
mod tests {
    use restgate_core::{RestgateConfig, RestgateError};
    use restgate_http::{App, Controller};

    use crate::{services_dir, test_registry};

    fn controller_over(dir: &std::path::Path, ns: Option<&str>) -> Controller {
        let config = RestgateConfig {
            services_dir: dir.display().to_string(),
            services_ns: ns.map(str::to_owned),
            ..RestgateConfig::default()
        };
        let mut controller = Controller::new();
        controller
            .set_app(Some(App::new(config)))
            .expect("bind app");
        controller
    }

    #[test]
    fn test_should_discover_one_definition_per_manifest() {
        let dir = services_dir(&["Widgets", "Bare", "Probe"]);
        let controller = controller_over(dir.path(), None);

        let discovered = controller
            .all_services(&test_registry())
            .expect("discovery");

        let mut names: Vec<&str> = discovered.iter().map(|d| d.qualified_name()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["Bare", "Probe", "Widgets"]);
    }

    #[test]
    fn test_should_skip_foreign_files_silently() {
        let dir = services_dir(&["Widgets"]);
        std::fs::write(dir.path().join("README.md"), "not a manifest").unwrap();
        std::fs::write(dir.path().join("widgets.backup"), "").unwrap();

        let controller = controller_over(dir.path(), None);
        let discovered = controller
            .all_services(&test_registry())
            .expect("discovery");
        assert_eq!(discovered.len(), 1);
    }

    #[test]
    fn test_should_apply_namespace_prefix() {
        let dir = services_dir(&["Widgets"]);
        let controller = controller_over(dir.path(), Some("api"));

        let discovered = controller
            .all_services(&test_registry())
            .expect("discovery");
        assert_eq!(discovered[0].qualified_name(), "api.Widgets");
    }

    #[test]
    fn test_should_abort_discovery_on_unknown_manifest() {
        let dir = services_dir(&["Widgets", "Phantom"]);
        let controller = controller_over(dir.path(), None);

        let err = controller.all_services(&test_registry()).unwrap_err();
        assert!(
            matches!(err, RestgateError::ServiceLoad { service, .. } if service == "Phantom")
        );
    }
}
