//! Auto-routing registration behavior.

#[cfg(test)]
mod tests {
    use restgate_core::{RestgateConfig, RestgateError};
    use restgate_http::{App, Controller};

    use crate::{services_dir, test_registry};

    fn wired_controller(names: &[&str]) -> (Controller, tempfile::TempDir) {
        let dir = services_dir(names);
        let config = RestgateConfig {
            services_dir: dir.path().display().to_string(),
            ..RestgateConfig::default()
        };
        let mut controller = Controller::new();
        controller
            .set_app(Some(App::new(config)))
            .expect("bind app");
        (controller, dir)
    }

    #[test]
    fn test_should_register_zero_routes_for_bare_service() {
        let (mut controller, _dir) = wired_controller(&["Bare"]);
        let discovered = controller
            .all_services(&test_registry())
            .expect("discovery");

        let installed = controller
            .add_auto_routing(&discovered)
            .expect("auto routing");

        assert_eq!(installed, 0);
        assert!(controller.app().expect("bound").routes().is_empty());
    }

    #[test]
    fn test_should_reject_conflicting_routes_across_services() {
        let (mut controller, _dir) = wired_controller(&["Widgets", "Clash"]);
        let discovered = controller
            .all_services(&test_registry())
            .expect("discovery");

        let err = controller.add_auto_routing(&discovered).unwrap_err();
        assert!(matches!(err, RestgateError::RouteConflict { .. }));
    }

    #[test]
    fn test_should_register_every_declared_operation() {
        let (mut controller, _dir) = wired_controller(&["Widgets", "Probe"]);
        let discovered = controller
            .all_services(&test_registry())
            .expect("discovery");

        let installed = controller
            .add_auto_routing(&discovered)
            .expect("auto routing");

        // Widgets exposes two operations, Probe one.
        assert_eq!(installed, 3);
        assert_eq!(controller.app().expect("bound").routes().len(), 3);
    }

    #[test]
    fn test_should_append_deserializer_per_set_app_call() {
        let (controller, _dir) = wired_controller(&[]);
        let app = controller.into_app().expect("bound");
        assert_eq!(app.middleware().len(), 1);

        // Re-binding the same app appends another deserializer instance;
        // the chain is deliberately not deduplicated.
        let mut controller = Controller::new();
        controller.set_app(Some(app)).expect("re-bind");
        let app = controller.into_app().expect("bound");
        assert_eq!(app.middleware().len(), 2);
    }
}
