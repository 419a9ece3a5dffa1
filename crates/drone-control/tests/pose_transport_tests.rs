//! 位姿控制器 / 速度流 与进程内总线的集成测试
//!
//! 测试里的"仿真器"只是同一总线上的另一组订阅/发布者。

use crossbeam_channel::{Receiver, unbounded};
use drone_control::{
    Command, Controller, MotionConfig, PoseController, StreamConfig, VelocityStreamer,
};
use drone_protocol::{CMD_VEL_TOPIC, POSE_TOPIC, Pose, SET_POSE_TOPIC, Twist};
use drone_transport::{MemoryTransport, Node, Subscription};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

const TIMEOUT: Duration = Duration::from_secs(2);

fn bus() -> Node {
    Node::new(Arc::new(MemoryTransport::new(64).unwrap()))
}

fn sniff<M: drone_protocol::Message>(node: &Node, topic: &str) -> (Subscription, Receiver<M>) {
    let (tx, rx) = unbounded::<M>();
    let sub = node
        .subscribe::<M, _>(topic, move |msg| {
            let _ = tx.send(msg);
        })
        .unwrap();
    (sub, rx)
}

/// 等待条件成立（遥测回调在总线线程上异步执行）
fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_commands_publish_targets() {
    let node = bus();
    let (_sub, targets) = sniff::<Pose>(&node, SET_POSE_TOPIC);
    let mut controller = PoseController::connect(&node, MotionConfig::default()).unwrap();

    controller.handle(&Command::Forward).unwrap();
    controller.handle(&Command::Takeoff).unwrap();

    assert_eq!(targets.recv_timeout(TIMEOUT).unwrap(), Pose::from_xyz(0.0, 1.0, 2.0));
    assert_eq!(targets.recv_timeout(TIMEOUT).unwrap(), Pose::from_xyz(0.0, 1.0, 3.0));
}

#[test]
fn test_hover_and_unknown_publish_nothing() {
    let node = bus();
    let (_sub, targets) = sniff::<Pose>(&node, SET_POSE_TOPIC);
    let mut controller = PoseController::connect(&node, MotionConfig::default()).unwrap();

    controller.handle(&Command::Hover).unwrap();
    controller.handle(&Command::parse("barrel roll")).unwrap();
    controller.handle(&Command::Help).unwrap();

    assert!(targets.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn test_telemetry_replaces_working_pose() {
    let node = bus();
    let mut controller = PoseController::connect(&node, MotionConfig::default()).unwrap();

    let simulator = node.advertise::<Pose>(POSE_TOPIC);
    simulator.publish(&Pose::from_xyz(5.0, -3.0, 7.0)).unwrap();

    assert!(wait_until(|| controller.current_pose() == Pose::from_xyz(5.0, -3.0, 7.0)));

    // 下一条命令基于遥测位姿计算
    let reply = controller.handle(&Command::Right).unwrap();
    assert_eq!(reply.to_string(), "Moving drone to position: (6.00, -3.00, 7.00)");
}

#[test]
fn test_land_clamps_against_reported_altitude() {
    let node = bus();
    let controller = PoseController::connect(&node, MotionConfig::default()).unwrap();

    node.advertise::<Pose>(POSE_TOPIC).publish(&Pose::from_xyz(0.0, 0.0, 0.7)).unwrap();
    assert!(wait_until(|| controller.current_pose().position.z == 0.7));

    controller.land().unwrap();
    assert_eq!(controller.current_pose().position.z, 0.5);
}

#[test]
fn test_custom_topics() {
    let node = bus();
    let (_sub, targets) = sniff::<Pose>(&node, "/model/x500/set_pose");
    let controller = PoseController::with_topics(
        &node,
        MotionConfig::default(),
        "/model/x500/set_pose",
        "/model/x500/pose",
    )
    .unwrap();

    controller.takeoff().unwrap();
    assert_eq!(targets.recv_timeout(TIMEOUT).unwrap().position.z, 3.0);
}

#[test]
fn test_stream_publishes_fixed_twist() {
    let node = bus();
    let (_sub, twists) = sniff::<Twist>(&node, CMD_VEL_TOPIC);

    let config = StreamConfig {
        rate_hz: 100.0,
        max_iterations: Some(3),
        ..Default::default()
    };
    let expected = config.twist;
    let streamer = VelocityStreamer::new(&node, config).unwrap();

    let running = AtomicBool::new(true);
    assert_eq!(streamer.run(&running).unwrap(), 3);

    for _ in 0..3 {
        assert_eq!(twists.recv_timeout(TIMEOUT).unwrap(), expected);
    }
}
