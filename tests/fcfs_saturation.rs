//! Scenario 1 (spec.md §8): capacity 10, ten jobs each requiring 5
//! resources for 100 time units, all arriving at t=0. Only two jobs fit at
//! once, so completions land in pairs at 100, 200, 300, 400, 500.

use std::cell::RefCell;
use std::rc::Rc;

use clustersim::ids::JobId;
use clustersim::kernel::{EventKind, Payload, Simulation};
use clustersim::scheduler::DefaultScheduler;
use clustersim::server::{ServerBuilder, User};
use clustersim::workunit::{Status, WorkUnit};

#[test]
fn ten_jobs_saturate_a_ten_resource_pool_in_fifo_pairs() {
    let completions: Rc<RefCell<Vec<JobId>>> = Rc::new(RefCell::new(Vec::new()));
    let recorder = Rc::clone(&completions);

    let mut sim = Simulation::new();
    let server_id = sim.register_entity(|id| {
        ServerBuilder::<DefaultScheduler>::new(10)
            .name("cluster")
            .listener(Box::new(move |job_id, _from, to| {
                if to == Status::Complete {
                    recorder.borrow_mut().push(job_id);
                }
            }))
            .build(id)
            .unwrap()
    });
    let user_id = sim.register_entity(|id| User::new(id, "driver", server_id));

    for i in 0..10 {
        let job = WorkUnit::new(JobId::new(i), user_id, 0, 100, 5, 0);
        sim.send(user_id, server_id, 0, EventKind::TaskArrive, Payload::NewJob(job))
            .unwrap();
    }

    sim.run().unwrap();

    assert_eq!(sim.now(), 500);
    assert_eq!(
        *completions.borrow(),
        (0..10).map(JobId::new).collect::<Vec<_>>(),
        "FCFS pairs must complete in submission order"
    );
}
