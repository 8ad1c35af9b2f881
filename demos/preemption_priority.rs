//! Preemption priority (spec.md §8 scenario 6): capacity 1, a low-priority
//! job running when two higher-priority jobs arrive should be bumped aside
//! and resumed later, finishing after both of them.

use clustersim::ids::JobId;
use clustersim::kernel::{EventKind, Payload, Simulation};
use clustersim::scheduler::PreemptionScheduler;
use clustersim::server::{ServerBuilder, User};
use clustersim::workunit::WorkUnit;

fn main() {
    tracing_subscriber::fmt::init();

    let mut sim = Simulation::new();
    let server_id = sim.register_entity(|id| {
        ServerBuilder::<PreemptionScheduler>::new(1)
            .name("cluster")
            .scheduler(PreemptionScheduler::new(5))
            .build(id)
            .expect("capacity 1 is a valid server")
    });
    let user_id = sim.register_entity(|id| User::new(id, "driver", server_id));

    let low_priority = WorkUnit::new(JobId::new(0), user_id, 0, 100, 1, 1);
    let high_priority_a = WorkUnit::new(JobId::new(1), user_id, 50, 100, 1, 0);
    let high_priority_b = WorkUnit::new(JobId::new(2), user_id, 170, 100, 1, 0);

    sim.send(user_id, server_id, 0, EventKind::TaskArrive, Payload::NewJob(low_priority)).unwrap();
    sim.send(user_id, server_id, 50, EventKind::TaskArrive, Payload::NewJob(high_priority_a)).unwrap();
    sim.send(user_id, server_id, 170, EventKind::TaskArrive, Payload::NewJob(high_priority_b)).unwrap();

    sim.run().expect("simulation runs to completion");
    println!("preemption_priority complete at t={}", sim.now());
}
