//! Full loop iterations: AppService + StatusServer on a loopback socket.

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use pillbox::app::events::AppEvent;
use pillbox::app::presence::PillStatus;
use pillbox::config::SystemConfig;
use pillbox::device::Device;
use pillbox::scheduler::DayIndex;
use pillbox::server::{PollOutcome, StatusServer};

use crate::mock_hw::{MockDisplay, MockHardware, RecordingSink};

const STEP_MS: u64 = 10;

type TestDevice = Device<MockHardware, MockDisplay, RecordingSink>;

fn test_config() -> SystemConfig {
    SystemConfig {
        rotation_period_ms: 5000,
        poll_period_ms: 50,
        request_timeout_ms: 500,
        ..SystemConfig::default()
    }
}

struct Rig {
    device: TestDevice,
    port: u16,
    now: u64,
}

impl Rig {
    fn new() -> Self {
        let config = test_config();
        let server = StatusServer::bind_port(0, &config).expect("bind loopback");
        let port = server.local_addr().expect("local addr").port();
        let mut device = Device::new(
            &config,
            0,
            MockHardware::new(),
            MockDisplay::new(),
            server,
            RecordingSink::new(),
        );
        device.start(0);
        Self {
            device,
            port,
            now: 0,
        }
    }

    fn run_until(&mut self, until_ms: u64) {
        while self.now < until_ms {
            self.now = (self.now + STEP_MS).min(until_ms);
            self.device.iterate(self.now);
        }
    }

    fn connect(&self) -> TcpStream {
        let stream = TcpStream::connect(("127.0.0.1", self.port)).expect("connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .expect("client timeout");
        stream
    }

    /// Send `request`, run one loop iteration, and return the raw response.
    fn fetch(&mut self, request: &[u8]) -> (PollOutcome, String) {
        let mut client = self.connect();
        client.write_all(request).expect("send request");
        self.now += STEP_MS;
        let report = self.device.iterate(self.now);
        let mut response = String::new();
        client.read_to_string(&mut response).expect("read response");
        (report.server, response)
    }

    fn get(&mut self) -> (PollOutcome, String) {
        self.fetch(b"GET / HTTP/1.1\r\nHost: 192.168.4.1\r\n\r\n")
    }
}

fn body(response: &str) -> &str {
    response.split_once("\r\n\r\n").map_or("", |(_, body)| body)
}

#[test]
fn idle_iteration_serves_nothing() {
    let mut rig = Rig::new();
    let report = rig.device.iterate(STEP_MS);
    assert_eq!(report.server, PollOutcome::Idle);
    assert_eq!(rig.device.server().served(), 0);
}

#[test]
fn wednesday_present_page() {
    let mut rig = Rig::new();
    rig.run_until(15_000);
    assert_eq!(rig.device.app().day(), DayIndex::new(3));

    let (outcome, response) = rig.get();
    assert!(matches!(outcome, PollOutcome::Served { bytes } if bytes == response.len()));
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("Cache-Control: no-cache, no-store, must-revalidate\r\n"));
    assert!(response.contains("Connection: close\r\n"));
    let body = body(&response);
    assert!(body.contains("<strong>Day: </strong>Wednesday"));
    assert!(body.contains("<strong>Status: </strong>Take the pill!"));
    assert!(body.contains("location.reload();}, 1000)"));
}

#[test]
fn served_page_matches_display() {
    let mut rig = Rig::new();
    rig.device.hw_mut().set_level(0, true);
    rig.run_until(100);
    assert_eq!(rig.device.app().status(), PillStatus::Taken);

    let (_, response) = rig.get();
    let lcd = rig.device.display();
    assert_eq!(lcd.row(0), "Day: Sunday");
    assert_eq!(lcd.row(1), "You're fine!");
    assert!(body(&response).contains("<strong>Status: </strong>You're fine!"));
    assert!(body(&response).contains("<strong>Day: </strong>Sunday"));
}

#[test]
fn page_shows_new_day_after_rotation() {
    let mut rig = Rig::new();
    // Rotation lands on a poll boundary, so the same iteration samples the
    // new day's sensor.
    rig.run_until(5000);
    let report = rig.device.iterate(5001);
    rig.now = 5001;
    assert_eq!(report.snapshot.day, DayIndex::new(1));
    let (_, response) = rig.get();
    assert!(body(&response).contains("Monday"));
}

#[test]
fn repeated_requests_are_byte_identical() {
    let mut rig = Rig::new();
    rig.run_until(200);
    let (_, first) = rig.get();
    rig.run_until(rig.now + 200);
    let (_, second) = rig.get();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn any_path_gets_the_same_page() {
    let mut rig = Rig::new();
    let (_, root) = rig.get();
    let (_, other) = rig.fetch(b"POST /favicon.ico HTTP/1.0\r\nContent-Length: 0\r\n\r\n");
    assert_eq!(root, other);
}

#[test]
fn empty_request_still_gets_a_response() {
    let mut rig = Rig::new();
    let mut client = rig.connect();
    client.shutdown(Shutdown::Write).expect("half-close");
    rig.now += STEP_MS;
    let report = rig.device.iterate(rig.now);
    let mut response = String::new();
    client.read_to_string(&mut response).expect("read response");
    assert!(matches!(report.server, PollOutcome::Served { .. }));
    assert!(response.contains("Pill Reminder System"));
}

#[test]
fn one_client_per_iteration() {
    let mut rig = Rig::new();
    let mut a = rig.connect();
    let mut b = rig.connect();
    a.write_all(b"GET / HTTP/1.1\r\n\r\n").expect("send a");
    b.write_all(b"GET / HTTP/1.1\r\n\r\n").expect("send b");

    rig.now += STEP_MS;
    rig.device.iterate(rig.now);
    assert_eq!(rig.device.server().served(), 1);

    rig.now += STEP_MS;
    rig.device.iterate(rig.now);
    assert_eq!(rig.device.server().served(), 2);

    let mut ra = String::new();
    let mut rb = String::new();
    a.read_to_string(&mut ra).expect("read a");
    b.read_to_string(&mut rb).expect("read b");
    assert_eq!(ra, rb);
}

#[test]
fn served_requests_are_reported_to_sink() {
    let mut rig = Rig::new();
    let (_, response) = rig.get();
    let served: Vec<usize> = rig
        .device
        .sink()
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::RequestServed { bytes } => Some(*bytes),
            _ => None,
        })
        .collect();
    assert_eq!(served, vec![response.len()]);
}

#[test]
fn loop_delay_comes_from_config() {
    let rig = Rig::new();
    assert_eq!(rig.device.loop_delay(), Duration::from_millis(10));
}
