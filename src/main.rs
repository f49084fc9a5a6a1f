#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

mod clock;
mod display;

use embedded_graphics::prelude::Size;
use num_traits::{FromPrimitive, ToPrimitive};
use watchface_core::{
    BatteryState, ClockTime, ConfigKey, FileStore, Framebuffer, OneShot, TimerAction,
    TimerRequest, WatchFace,
};

use crate::clock::{ms_to_next_second, Clock};
use crate::display::FramePoster;

const SERVER_NAME: &str = "_Watchface_";
const STORAGE_DIR: &str = "watchface";

// Round panel
const SCREEN_WIDTH: u32 = 180;
const SCREEN_HEIGHT: u32 = 180;

#[derive(Debug, num_derive::FromPrimitive, num_derive::ToPrimitive)]
enum AppOp {
    Redraw = 0,
    Rawkeys,
    ClockTick,
    StopwatchTimer,
    /// arg1 = config key, arg2 = value (non-zero is true)
    Configure,
    /// arg1 = percent, arg2 = charging. Posted by the platform's battery
    /// status service to `SERVER_NAME` on every change; the label stays
    /// blank until the first report arrives.
    Battery,
    Quit,
}

#[derive(Debug, num_derive::FromPrimitive, num_derive::ToPrimitive)]
enum TimerOp {
    /// arg1 = token, arg2/arg3 = low/high half of the monotonic deadline
    Arm = 0,
    Cancel,
    Quit,
}

struct WatchfaceApp {
    face: WatchFace<FileStore>,
    screen: Framebuffer,
    display: FramePoster,
    clock: Clock,
    timer_conn: xous::CID,
    frames: u64,
}

impl WatchfaceApp {
    fn new(timer_sid: xous::SID) -> Self {
        let tt = ticktimer_server::Ticktimer::new().unwrap();
        let clock = Clock::new(tt);
        let timer_conn = xous::connect(timer_sid).expect("can't connect to stopwatch timer");

        let store = FileStore::new(STORAGE_DIR);
        let size = Size::new(SCREEN_WIDTH, SCREEN_HEIGHT);
        let (face, action) = WatchFace::open(store, size, clock.now());

        let app = Self {
            face,
            screen: Framebuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            display: FramePoster::new(xous_names::XousNames::new().unwrap()),
            clock,
            timer_conn,
            frames: 0,
        };
        app.apply_timer_action(action);
        app
    }

    fn apply_timer_action(&self, action: Option<TimerAction>) {
        let msg = match action {
            Some(TimerAction::Arm(req)) => xous::Message::new_scalar(
                TimerOp::Arm.to_usize().unwrap_or(0),
                req.token as usize,
                (req.deadline_ms & 0xffff_ffff) as usize,
                (req.deadline_ms >> 32) as usize,
                0,
            ),
            Some(TimerAction::Cancel) => {
                xous::Message::new_scalar(TimerOp::Cancel.to_usize().unwrap_or(1), 0, 0, 0, 0)
            }
            None => return,
        };
        if let Err(e) = xous::send_message(self.timer_conn, msg) {
            log::error!("stopwatch timer unreachable: {:?}", e);
        }
    }

    fn redraw(&mut self) {
        if !self.face.needs_redraw() {
            return;
        }
        let now = self.clock.now();
        let time = ClockTime::from_time(&self.clock.local());
        if self.face.redraw(&mut self.screen, &mut self.display, now, time) {
            self.frames += 1;
            log::trace!("frame {} ({} px lit)", self.frames, self.screen.count_on());
        }
    }

    fn handle_key(&mut self, key: char) {
        let now = self.clock.now();
        match key {
            '↑' | 'k' => {
                let action = self.face.on_up_button(now);
                self.apply_timer_action(Some(action));
            }
            '↓' | 'j' => {
                self.face.on_down_button(now);
            }
            _ => return,
        }
        self.redraw();
    }

    fn handle_clock_tick(&mut self) {
        let local = self.clock.local();
        self.face.on_clock_tick(&local);
        self.redraw();
    }

    fn handle_stopwatch_timer(&mut self, token: u32) {
        let action = self.face.on_stopwatch_timer(token, self.clock.now());
        if action.is_some() {
            self.apply_timer_action(action);
            self.redraw();
        }
    }

    fn handle_configure(&mut self, key: usize, value: usize) {
        let changes = match ConfigKey::from_usize(key) {
            Some(key) => vec![(key, value != 0)],
            None => {
                log::warn!("unknown config key {}", key);
                Vec::new()
            }
        };
        let action = self.face.on_configure(&changes, self.clock.now());
        self.apply_timer_action(action);
        self.redraw();
    }

    fn handle_battery(&mut self, percent: usize, charging: usize) {
        self.face.on_battery(BatteryState {
            percent: percent.min(100) as u8,
            charging: charging != 0,
        });
        self.redraw();
    }
}

enum TimerControl {
    Arm(TimerRequest),
    Cancel,
    Quit,
}

fn timer_control(env: &xous::MessageEnvelope) -> Option<TimerControl> {
    if let xous::Message::Scalar(scalar) = &env.body {
        match FromPrimitive::from_usize(scalar.id) {
            Some(TimerOp::Arm) => {
                let deadline_ms = (scalar.arg2 as u64 & 0xffff_ffff) | ((scalar.arg3 as u64) << 32);
                Some(TimerControl::Arm(TimerRequest {
                    token: scalar.arg1 as u32,
                    after_ms: 0,
                    deadline_ms,
                }))
            }
            Some(TimerOp::Cancel) => Some(TimerControl::Cancel),
            Some(TimerOp::Quit) => Some(TimerControl::Quit),
            None => None,
        }
    } else {
        None
    }
}

/// Applies a control message; returns `false` on quit.
fn apply_control(timer: &mut OneShot, env: &xous::MessageEnvelope) -> bool {
    match timer_control(env) {
        Some(TimerControl::Arm(req)) => timer.arm(req),
        Some(TimerControl::Cancel) => timer.cancel(),
        Some(TimerControl::Quit) => return false,
        None => log::warn!("stopwatch timer: unknown message {:?}", env),
    }
    true
}

/// One-shot timer: sleeps until the armed deadline, then reports the token
/// back. Control messages that arrive during a sleep are applied on waking
/// and only the time left to the new deadline is slept.
fn stopwatch_timer_thread(timer_sid: xous::SID, main_conn: xous::CID) {
    let tt = ticktimer_server::Ticktimer::new().unwrap();
    let mut timer = OneShot::new();

    loop {
        let now = tt.elapsed_ms();
        match timer.remaining_ms(now) {
            Some(0) => {
                if let Some(token) = timer.take_expired(now) {
                    xous::send_message(
                        main_conn,
                        xous::Message::new_scalar(
                            AppOp::StopwatchTimer.to_usize().unwrap_or(0),
                            token as usize,
                            0,
                            0,
                            0,
                        ),
                    )
                    .ok();
                }
            }
            Some(remaining) => {
                tt.sleep_ms(remaining as usize).ok();
                while let Ok(Some(env)) = xous::try_receive_message(timer_sid) {
                    if !apply_control(&mut timer, &env) {
                        return;
                    }
                }
            }
            None => {
                // Block-wait when idle
                let env = match xous::receive_message(timer_sid) {
                    Ok(env) => env,
                    Err(_) => continue,
                };
                if !apply_control(&mut timer, &env) {
                    return;
                }
            }
        }
    }
}

/// 1 Hz tick aligned to wall-clock second boundaries.
fn clock_tick_thread(main_conn: xous::CID) {
    let tt = ticktimer_server::Ticktimer::new().unwrap();
    loop {
        tt.sleep_ms(ms_to_next_second()).ok();
        let sent = xous::send_message(
            main_conn,
            xous::Message::new_scalar(AppOp::ClockTick.to_usize().unwrap_or(0), 0, 0, 0, 0),
        );
        if sent.is_err() {
            break;
        }
    }
}

fn main() -> ! {
    log_server::init_wait().unwrap();
    log::set_max_level(log::LevelFilter::Info);
    log::info!("Watchface PID is {}", xous::process::id());

    let xns = xous_names::XousNames::new().unwrap();
    let sid = xns.register_name(SERVER_NAME, None).expect("can't register server");
    let main_conn = xous::connect(sid).expect("can't connect to self");

    let timer_sid = xous::create_server().expect("can't create stopwatch timer server");
    std::thread::spawn(move || {
        stopwatch_timer_thread(timer_sid, main_conn);
    });
    std::thread::spawn(move || {
        clock_tick_thread(main_conn);
    });

    let mut app = WatchfaceApp::new(timer_sid);
    app.redraw();

    loop {
        let msg = xous::receive_message(sid).unwrap();
        match FromPrimitive::from_usize(msg.body.id()) {
            Some(AppOp::Redraw) => {
                app.redraw();
            }
            Some(AppOp::Rawkeys) => xous::msg_scalar_unpack!(msg, k1, k2, k3, k4, {
                let keys = [
                    core::char::from_u32(k1 as u32).unwrap_or('\u{0000}'),
                    core::char::from_u32(k2 as u32).unwrap_or('\u{0000}'),
                    core::char::from_u32(k3 as u32).unwrap_or('\u{0000}'),
                    core::char::from_u32(k4 as u32).unwrap_or('\u{0000}'),
                ];
                for &key in keys.iter() {
                    if key != '\u{0000}' {
                        app.handle_key(key);
                    }
                }
            }),
            Some(AppOp::ClockTick) => {
                app.handle_clock_tick();
            }
            Some(AppOp::StopwatchTimer) => xous::msg_scalar_unpack!(msg, token, _, _, _, {
                app.handle_stopwatch_timer(token as u32);
            }),
            Some(AppOp::Configure) => xous::msg_scalar_unpack!(msg, key, value, _, _, {
                app.handle_configure(key, value);
            }),
            Some(AppOp::Battery) => xous::msg_scalar_unpack!(msg, percent, charging, _, _, {
                app.handle_battery(percent, charging);
            }),
            Some(AppOp::Quit) => break,
            _ => log::error!("unknown opcode: {:?}", msg),
        }
    }

    // Clean up
    app.apply_timer_action(Some(TimerAction::Cancel));
    xous::send_message(
        app.timer_conn,
        xous::Message::new_scalar(TimerOp::Quit.to_usize().unwrap_or(2), 0, 0, 0, 0),
    )
    .ok();
    xns.unregister_server(sid).unwrap();
    unsafe { xous::destroy_server(sid).unwrap() };
    xous::terminate_process(0)
}
