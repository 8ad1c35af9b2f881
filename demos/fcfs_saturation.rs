//! FCFS saturation (spec.md §8 scenario 1): capacity 10, ten jobs each
//! requiring 5 resources for 100 time units, all arriving at t=0.
//! Expected starts: jobs 0,1 at 0; 2,3 at 100; 4,5 at 200; 6,7 at 300;
//! 8,9 at 400, all ending `COMPLETE`.

use clustersim::ids::JobId;
use clustersim::kernel::{EventKind, Payload, Simulation};
use clustersim::scheduler::DefaultScheduler;
use clustersim::server::{ServerBuilder, User};
use clustersim::workunit::WorkUnit;

fn main() {
    tracing_subscriber::fmt::init();

    let mut sim = Simulation::new();
    let server_id = sim.register_entity(|id| {
        ServerBuilder::<DefaultScheduler>::new(10)
            .name("cluster")
            .build(id)
            .expect("capacity 10 is a valid server")
    });
    let user_id = sim.register_entity(|id| User::new(id, "driver", server_id));

    for i in 0..10 {
        let job = WorkUnit::new(JobId::new(i), user_id, 0, 100, 5, 0);
        sim.send(user_id, server_id, 0, EventKind::TaskArrive, Payload::NewJob(job))
            .expect("seeding arrivals before run is legal");
    }

    sim.run().expect("simulation runs to completion");
    println!("fcfs_saturation complete at t={}", sim.now());
}
