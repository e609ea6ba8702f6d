//! Synthetic telemetry feed
//!
//! Stands in for the simulator: creates the physics page and rewrites it
//! with a layout-conforming record at a fixed rate, so the watcher can be
//! exercised without the game running.
//!
//! Run with: cargo run --example synthetic_feed

use actelem::{physics_layout, ElementKind, PHYSICS_PAGE};
use rustix::fs::ftruncate;
use rustix::mm::{mmap, MapFlags, ProtFlags};
use rustix::shm::{shm_open, Mode, ShmOFlags};
use std::ffi::CString;
use std::thread;
use std::time::Duration;

/// Build one layout-conforming record with a few moving values
fn encode_record(tick: u32) -> Vec<u8> {
    let layout = physics_layout();
    let mut buf = Vec::with_capacity(layout.byte_size());
    let t = tick as f32 * 0.1;

    for field in layout.fields() {
        for lane in 0..field.element_count() {
            match field.kind {
                ElementKind::Int32 => {
                    let v: i32 = match field.name {
                        "packetId" => tick as i32,
                        "gear" => 4,
                        "rpm" => 6500 + (t.sin() * 800.0) as i32,
                        "isEngineRunning" => 1,
                        _ => 0,
                    };
                    buf.extend_from_slice(&v.to_le_bytes());
                }
                ElementKind::Float32 => {
                    let v: f32 = match field.name {
                        "gas" => (t.sin() * 0.5 + 0.5).clamp(0.0, 1.0),
                        "speedKmh" => 140.0 + t.sin() * 40.0,
                        "fuel" => 40.0 - tick as f32 * 0.001,
                        "wheelAngularSpeed" => 90.0 + lane as f32,
                        "tyreTemp" => 82.0 + lane as f32 * 1.5,
                        _ => 0.0,
                    };
                    buf.extend_from_slice(&v.to_le_bytes());
                }
            }
        }
    }
    buf
}

fn main() {
    let layout = physics_layout();
    let len = layout.byte_size();

    println!("Synthetic feed: publishing '{PHYSICS_PAGE}' ({len} bytes, 10 Hz)");
    println!("Watch it with: cargo run -p actelem-watch");

    let c_name = CString::new(format!("/{PHYSICS_PAGE}")).unwrap();
    let fd = shm_open(
        c_name.as_c_str(),
        ShmOFlags::CREATE | ShmOFlags::RDWR,
        Mode::RUSR | Mode::WUSR | Mode::RGRP | Mode::ROTH,
    )
    .expect("failed to create page");
    ftruncate(&fd, len as u64).expect("failed to size page");

    let addr = unsafe {
        mmap(
            std::ptr::null_mut(),
            len,
            ProtFlags::READ | ProtFlags::WRITE,
            MapFlags::SHARED,
            &fd,
            0,
        )
        .expect("failed to map page")
    };

    let mut tick = 0u32;
    loop {
        let record = encode_record(tick);
        unsafe {
            std::ptr::copy_nonoverlapping(record.as_ptr(), addr.cast::<u8>(), record.len());
        }
        tick = tick.wrapping_add(1);
        thread::sleep(Duration::from_millis(100));
    }
}
