// tests/property_launch.rs

use proptest::prelude::*;
use tokio::sync::mpsc;

use svcrun::engine::{CoreSupervisor, ProcessState, Runtime, SupervisorEvent};
use svcrun_test_utils::builders::descriptor;
use svcrun_test_utils::fake_backend::FakeBackend;

// Strategy: 1..=12 services, each either spawning fine or failing to spawn.
fn services_strategy() -> impl Strategy<Value = Vec<bool>> {
    proptest::collection::vec(any::<bool>(), 1..=12)
}

proptest! {
    #[test]
    fn launch_all_yields_one_record_per_descriptor_in_order(spawn_ok in services_strategy()) {
        let names: Vec<String> = (0..spawn_ok.len()).map(|i| format!("svc_{i}")).collect();

        let mut backend = FakeBackend::new();
        for (name, ok) in names.iter().zip(&spawn_ok) {
            if !ok {
                backend = backend.fail_spawn(name);
            }
        }
        let log = backend.log();

        let descriptors = names.iter().map(|n| descriptor(n, format!("/srv/{n}"))).collect();
        let (_tx, rx) = mpsc::channel::<SupervisorEvent>(4);
        let mut runtime = Runtime::new(CoreSupervisor::new(descriptors), rx, backend);

        let processes = runtime.launch_all();

        prop_assert_eq!(processes.len(), names.len());
        for ((process, name), ok) in processes.iter().zip(&names).zip(&spawn_ok) {
            prop_assert_eq!(process.name(), name.as_str());
            if *ok {
                prop_assert_eq!(process.state(), &ProcessState::Running);
                prop_assert!(process.pid().is_some());
            } else {
                prop_assert!(process.state().is_failed());
                prop_assert!(process.pid().is_none());
            }
        }
        prop_assert_eq!(log.spawned(), names);
    }
}
