//! Scenario 5 (spec.md §8): conservative backfilling must never delay a
//! job past the start time it was promised when enqueued. Cancelling a
//! blocking job should only ever pull later jobs earlier, never later.

use std::cell::RefCell;
use std::rc::Rc;

use clustersim::ids::JobId;
use clustersim::kernel::{EventKind, Payload, Simulation};
use clustersim::scheduler::ConservativeScheduler;
use clustersim::server::{ServerBuilder, User};
use clustersim::workunit::{Status, WorkUnit};

#[test]
fn cancelling_a_blocker_only_ever_advances_the_backfilled_job() {
    let starts: Rc<RefCell<Vec<(JobId, i64)>>> = Rc::new(RefCell::new(Vec::new()));
    let recorder = Rc::clone(&starts);

    let mut sim = Simulation::new();
    let server_id = sim.register_entity(|id| {
        ServerBuilder::<ConservativeScheduler>::new(4)
            .name("cluster")
            .listener(Box::new(move |job_id, _from, to| {
                if to == Status::InExecution {
                    recorder.borrow_mut().push((job_id, 0));
                }
            }))
            .build(id)
            .unwrap()
    });
    let user_id = sim.register_entity(|id| User::new(id, "driver", server_id));

    let blocker = WorkUnit::new(JobId::new(0), user_id, 0, 100, 4, 0);
    let waiter = WorkUnit::new(JobId::new(1), user_id, 0, 50, 4, 0);
    sim.send(user_id, server_id, 0, EventKind::TaskArrive, Payload::NewJob(blocker))
        .unwrap();
    sim.send(user_id, server_id, 0, EventKind::TaskArrive, Payload::NewJob(waiter))
        .unwrap();
    sim.send(user_id, server_id, 10, EventKind::TaskCancel, Payload::Job(JobId::new(0)))
        .unwrap();

    sim.run().unwrap();

    let job_ids: Vec<JobId> = starts.borrow().iter().map(|(id, _)| *id).collect();
    assert_eq!(job_ids, vec![JobId::new(0), JobId::new(1)]);
    assert!(sim.now() <= 100, "cancelling the blocker must not push job 1 past its original t=100 promise");
}
