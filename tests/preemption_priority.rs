//! Scenario 6 (spec.md §8): a running low-priority job is bumped aside by
//! higher-priority arrivals on a single-resource pool and must resume only
//! after both of them finish, paying the configured resume overhead.

use std::cell::RefCell;
use std::rc::Rc;

use clustersim::ids::JobId;
use clustersim::kernel::{EventKind, Payload, Simulation};
use clustersim::scheduler::PreemptionScheduler;
use clustersim::server::{ServerBuilder, User};
use clustersim::workunit::{Status, WorkUnit};

#[test]
fn higher_priority_arrivals_preempt_and_outrun_the_low_priority_job() {
    let completions: Rc<RefCell<Vec<JobId>>> = Rc::new(RefCell::new(Vec::new()));
    let recorder = Rc::clone(&completions);

    let mut sim = Simulation::new();
    let server_id = sim.register_entity(|id| {
        ServerBuilder::<PreemptionScheduler>::new(1)
            .name("cluster")
            .scheduler(PreemptionScheduler::new(5))
            .listener(Box::new(move |job_id, _from, to| {
                if to == Status::Complete {
                    recorder.borrow_mut().push(job_id);
                }
            }))
            .build(id)
            .unwrap()
    });
    let user_id = sim.register_entity(|id| User::new(id, "driver", server_id));

    let low_priority = WorkUnit::new(JobId::new(0), user_id, 0, 100, 1, 1);
    let high_priority_a = WorkUnit::new(JobId::new(1), user_id, 50, 100, 1, 0);
    let high_priority_b = WorkUnit::new(JobId::new(2), user_id, 170, 100, 1, 0);

    sim.send(user_id, server_id, 0, EventKind::TaskArrive, Payload::NewJob(low_priority))
        .unwrap();
    sim.send(user_id, server_id, 50, EventKind::TaskArrive, Payload::NewJob(high_priority_a))
        .unwrap();
    sim.send(user_id, server_id, 170, EventKind::TaskArrive, Payload::NewJob(high_priority_b))
        .unwrap();

    sim.run().unwrap();

    let order = completions.borrow().clone();
    assert_eq!(
        order,
        vec![JobId::new(1), JobId::new(2), JobId::new(0)],
        "both higher-priority jobs must finish before the preempted low-priority job resumes and completes"
    );
}
