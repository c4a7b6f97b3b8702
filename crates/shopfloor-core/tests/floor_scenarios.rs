use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;

use shopfloor_core::domain::{FloorEvent, Role, StationType, TaskSetId, TaskSetSpec};
use shopfloor_core::impls::{InstantWorkload, MemoryEventSink, PanicOnFault};
use shopfloor_core::{Floor, FloorBuilder, FloorConfig, SubmitError, Timings};

const BUDGET: Duration = Duration::from_secs(5);
const STALL: Duration = Duration::from_millis(200);

const FULL_LINE: [&str; 5] = ["pickup", "welding", "assembly", "painting", "dropoff"];

fn line(id: u64, stations: &[&str]) -> TaskSetSpec {
    TaskSetSpec::from_pairs(id, stations.iter().map(|station| (*station, "part")))
}

fn uniform(facilities_per_type: usize, workers_per_role: usize) -> FloorBuilder {
    let mut builder = FloorBuilder::new();
    for station in StationType::ALL {
        builder = builder.facilities(station, facilities_per_type);
    }
    for role in Role::ALL {
        builder = builder.workers(role, workers_per_role);
    }
    builder
}

async fn boot(builder: FloorBuilder) -> (Floor, Arc<MemoryEventSink>) {
    let sink = Arc::new(MemoryEventSink::new());
    let floor = builder
        .event_sink(sink.clone())
        .workload(Arc::new(InstantWorkload))
        .fault_handler(Arc::new(PanicOnFault))
        .boot()
        .await
        .unwrap();
    (floor, sink)
}

fn position(events: &[FloorEvent], wanted: impl Fn(&FloorEvent) -> bool) -> usize {
    events
        .iter()
        .position(wanted)
        .unwrap_or_else(|| panic!("event not found in {events:#?}"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn welding_rendezvous_gathers_two_welders_and_the_transporter() {
    let builder = FloorBuilder::new()
        .facilities(StationType::Pickup, 1)
        .facilities(StationType::Welding, 1)
        .facilities(StationType::Dropoff, 1);
    let builder = Role::ALL
        .into_iter()
        .fold(builder, |builder, role| builder.workers(role, 2));
    let (floor, sink) = boot(builder).await;

    floor.submit(line(1, &["pickup", "welding", "dropoff"])).await.unwrap();
    assert!(floor.wait_for_completed(1, BUDGET).await);
    assert_eq!(floor.completed(), 1);

    let events = sink.events_for(TaskSetId::new(1));
    let arrived_at_welding = events
        .iter()
        .filter(|event| matches!(event, FloorEvent::WorkerArrived { station: StationType::Welding, .. }))
        .count();
    assert_eq!(arrived_at_welding, 3);

    let crew = position(&events, |e| {
        matches!(e, FloorEvent::CrewComplete { station: StationType::Welding, .. })
    });
    let worked = position(&events, |e| {
        matches!(e, FloorEvent::WorkFinished { station: StationType::Welding, .. })
    });
    assert!(crew < worked);

    let FloorEvent::CrewComplete { roles, .. } = &events[crew] else {
        unreachable!()
    };
    let welders = roles.iter().filter(|role| **role == Role::Welding).count();
    let transporters = roles.iter().filter(|role| **role == Role::Transport).count();
    assert_eq!((welders, transporters, roles.len()), (2, 1, 3));

    floor.shutdown().await;
}

#[rstest]
#[case::no_pickup(StationType::Pickup)]
#[case::no_welding(StationType::Welding)]
#[case::no_dropoff(StationType::Dropoff)]
#[tokio::test]
async fn missing_facility_type_stalls_forever(#[case] missing: StationType) {
    let (floor, _sink) = boot(uniform(1, 2).facilities(missing, 0)).await;

    floor.submit(line(1, &["pickup", "welding", "dropoff"])).await.unwrap();
    assert!(!floor.wait_for_completed(1, STALL).await);
    assert_eq!(floor.completed(), 0);
    assert!(floor.completed_task_sets().await.is_empty());

    floor.shutdown().await;
}

#[tokio::test]
async fn too_few_welders_stalls_at_the_dispatcher() {
    let (floor, sink) = boot(uniform(1, 2).workers(Role::Welding, 1)).await;

    floor.submit(line(1, &["pickup", "welding", "dropoff"])).await.unwrap();
    assert!(!floor.wait_for_completed(1, STALL).await);

    // The facility was bound and the transporter went there; the crew never came.
    let events = sink.events_for(TaskSetId::new(1));
    assert!(events
        .iter()
        .any(|e| matches!(e, FloorEvent::TaskAssigned { station: StationType::Welding, .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, FloorEvent::CrewDispatched { .. })));

    floor.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_full_lines_complete_and_return_everything() {
    let (floor, sink) = boot(uniform(2, 2)).await;

    let mut submitters = Vec::new();
    let floor = Arc::new(floor);
    for id in 1..=3 {
        let floor = Arc::clone(&floor);
        submitters.push(tokio::spawn(async move { floor.submit(line(id, &FULL_LINE)).await }));
    }
    for submitter in submitters {
        submitter.await.unwrap().unwrap();
    }

    assert!(floor.wait_for_completed(3, BUDGET).await);
    assert!(floor.wait_until_idle(BUDGET).await);

    let counts = floor.counts().await;
    assert_eq!(counts.completed_task_sets, 3);
    assert_eq!(counts.idle_workers(), counts.total_workers());
    assert_eq!(counts.total_workers(), 8);
    assert_eq!(counts.idle_facilities(), counts.total_facilities());
    assert_eq!(counts.total_facilities(), 10);

    let mut finished = floor.completed_task_sets().await;
    finished.sort();
    assert_eq!(finished, vec![TaskSetId::new(1), TaskSetId::new(2), TaskSetId::new(3)]);

    for id in 1..=3 {
        let events = sink.events_for(TaskSetId::new(id));
        let completed = events
            .iter()
            .filter(|e| matches!(e, FloorEvent::TaskCompleted { .. }))
            .count();
        assert_eq!(completed, FULL_LINE.len());
        let sets_completed = events
            .iter()
            .filter(|e| matches!(e, FloorEvent::TaskSetCompleted { .. }))
            .count();
        assert_eq!(sets_completed, 1);
    }

    let floor = Arc::into_inner(floor).unwrap();
    floor.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tasks_within_a_set_run_strictly_in_order() {
    let (floor, sink) = boot(uniform(1, 2)).await;

    floor.submit(line(9, &FULL_LINE)).await.unwrap();
    floor.submit(line(10, &FULL_LINE)).await.unwrap();
    assert!(floor.wait_for_completed(2, BUDGET).await);

    for id in [9, 10] {
        let events = sink.events_for(TaskSetId::new(id));
        for index in 1..FULL_LINE.len() {
            let previous_done = position(&events, |e| {
                matches!(e, FloorEvent::TaskCompleted { index: i, .. } if *i == index - 1)
            });
            let next_requested = position(&events, |e| {
                matches!(e, FloorEvent::DispatchRequested { index: i, .. } if *i == index)
            });
            assert!(previous_done < next_requested, "task set {id}, task {index}");
        }
    }

    floor.shutdown().await;
}

#[tokio::test]
async fn every_station_visit_follows_the_rendezvous_protocol() {
    let (floor, sink) = boot(uniform(1, 2)).await;

    floor.submit(line(4, &["pickup", "assembly", "painting", "pickup", "dropoff"])).await.unwrap();
    assert!(floor.wait_for_completed(1, BUDGET).await);

    let events = sink.events_for(TaskSetId::new(4));
    for index in 0..5 {
        let at = |kind: fn(&FloorEvent) -> bool| {
            position(&events, move |e| kind(e) && e.task_index() == Some(index))
        };
        let assigned = at(|e| matches!(e, FloorEvent::TaskAssigned { .. }));
        let crew = at(|e| matches!(e, FloorEvent::CrewComplete { .. }));
        let worked = at(|e| matches!(e, FloorEvent::WorkFinished { .. }));
        let completed = at(|e| matches!(e, FloorEvent::TaskCompleted { .. }));
        assert!(assigned < crew && crew < worked && worked < completed, "task {index}");
    }

    floor.shutdown().await;
}

#[tokio::test]
async fn sleeping_workload_from_config_completes() {
    let mut config = FloorConfig::default();
    config.timings = Timings::uniform(2);
    let sink = Arc::new(MemoryEventSink::new());
    let floor = FloorBuilder::from_config(config)
        .event_sink(sink.clone())
        .boot()
        .await
        .unwrap();

    floor.submit(line(1, &FULL_LINE)).await.unwrap();
    assert!(floor.wait_for_completed(1, BUDGET).await);
    assert!(floor.wait_until_idle(BUDGET).await);
    assert!(floor.counts().await.all_idle());

    floor.shutdown().await;
}

#[tokio::test]
async fn unknown_station_rejects_the_whole_set() {
    let (floor, sink) = boot(uniform(1, 1)).await;

    let err = floor
        .submit(line(5, &["pickup", "polishing", "dropoff"]))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::UnknownStation { index: 1, .. }));

    let events = sink.events_for(TaskSetId::new(5));
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], FloorEvent::TaskSetRejected { .. }));

    // Nothing was acquired on its behalf.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(floor.counts().await.all_idle());

    floor.shutdown().await;
}

#[rstest]
#[case::empty(line(6, &[]))]
#[case::starts_elsewhere(line(7, &["welding", "dropoff"]))]
#[tokio::test]
async fn malformed_sets_are_refused(#[case] spec: TaskSetSpec) {
    let (floor, _sink) = boot(uniform(1, 1)).await;
    assert!(floor.submit(spec).await.is_err());
    assert_eq!(floor.completed(), 0);
    floor.shutdown().await;
}
