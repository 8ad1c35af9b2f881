//! Conservative backfilling determinism (spec.md §8 scenario 5): once a
//! later job holds a tentative future slot, cancelling an earlier running
//! job compresses the schedule without ever delaying anyone further.

use clustersim::ids::JobId;
use clustersim::kernel::{EventKind, Payload, Simulation};
use clustersim::scheduler::ConservativeScheduler;
use clustersim::server::{ServerBuilder, User};
use clustersim::workunit::WorkUnit;

fn main() {
    tracing_subscriber::fmt::init();

    let mut sim = Simulation::new();
    let server_id = sim.register_entity(|id| {
        ServerBuilder::<ConservativeScheduler>::new(4)
            .name("cluster")
            .build(id)
            .expect("capacity 4 is a valid server")
    });
    let user_id = sim.register_entity(|id| User::new(id, "driver", server_id));

    // Job 0 occupies the whole pool; job 1 arrives right after and must
    // wait for the full 100 units, holding a tentative slot at t=100.
    let blocker = WorkUnit::new(JobId::new(0), user_id, 0, 100, 4, 0);
    let waiter = WorkUnit::new(JobId::new(1), user_id, 0, 50, 4, 0);
    sim.send(user_id, server_id, 0, EventKind::TaskArrive, Payload::NewJob(blocker)).unwrap();
    sim.send(user_id, server_id, 0, EventKind::TaskArrive, Payload::NewJob(waiter)).unwrap();

    // Cancelling the blocker at t=10 should compress job 1 forward.
    sim.send(user_id, server_id, 10, EventKind::TaskCancel, Payload::Job(JobId::new(0))).unwrap();

    sim.run().expect("simulation runs to completion");
    println!("conservative_backfill complete at t={}", sim.now());
}
