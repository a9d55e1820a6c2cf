//! # Scheduler Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ctrl_if::input::{Button, ControllerId};
use ctrl_lib::{
    bindings,
    loc::FieldLayout,
    params::CtrlExecParams,
    robot::Robot,
    sched::{Action, ActionFactory, Scheduler, Trigger},
    sim::{SimFollower, SimPlant},
};

fn scheduler_benchmark(c: &mut Criterion) {
    // ---- Build the robot with its real bindings ----

    let params: CtrlExecParams =
        util::params::from_str(include_str!("../../params/ctrl_exec.toml")).unwrap();
    let field: FieldLayout =
        util::params::from_str(include_str!("../../params/field.toml")).unwrap();

    let mut robot = Robot::new(
        field,
        Box::new(SimFollower::new(params.sim, params.cycle_period_s)),
    );
    robot.pose = Some(params.sim.initial_pose);
    let plant = SimPlant::new(params.sim, params.cycle_period_s);

    let mut sched = Scheduler::new();
    bindings::configure(&mut sched, &params).unwrap();

    // Idle cycle, only the defaults running
    c.bench_function("Scheduler::tick::idle", |b| {
        b.iter(|| black_box(sched.tick(&mut robot)))
    });

    // Alternate between aligning and driving every 50 cycles, so each start computes a target
    let mut cycle: u64 = 0;
    c.bench_function("Scheduler::tick::align", |b| {
        b.iter(|| {
            let pressed = (cycle / 50) % 2 == 0;
            robot
                .input
                .controller_mut(ControllerId::Driver)
                .set_button(Button::X, pressed);
            robot.time_s += params.cycle_period_s;

            let report = sched.tick(&mut robot);
            plant.step(&mut robot);

            cycle += 1;
            black_box(report)
        })
    });

    // ---- Many triggers and independent resources ----

    let mut sched: Scheduler<Robot> = Scheduler::new();
    for i in 0..64 {
        let r = sched.register_resource(&format!("r{}", i));
        sched.add_trigger(
            Trigger::new(&format!("t{}", i), move |robot: &Robot| {
                ((robot.time_s * 50.0) as usize + i) % 4 == 0
            })
            .while_true(ActionFactory::infallible("spin", move || {
                Action::run("spin", std::iter::once(r).collect(), |_: &mut Robot| ())
            })),
        );
    }

    c.bench_function("Scheduler::tick::triggers=64", |b| {
        b.iter(|| {
            robot.time_s += params.cycle_period_s;
            black_box(sched.tick(&mut robot))
        })
    });
}

criterion_group!(benches, scheduler_benchmark);
criterion_main!(benches);
