//! Receiver adapter: buffer management and failure behavior.

use anyhow::Result;
use signal_hound::blocks::sp::SpParams;
use signal_hound::blocks::Source;
use signal_hound::blocks::SourceBlock;
use signal_hound::device::sim::Event;
use signal_hound::device::sim::SimReceiver;
use signal_hound::Complex32;
use signal_hound::Error;
use signal_hound::Status;

fn buf(n: usize) -> Vec<Complex32> {
    vec![Complex32::new(0.0, 0.0); n]
}

#[test]
fn produces_the_full_requested_count() -> Result<()> {
    let dev = SimReceiver::new();
    let mut src = Source::new(dev, SpParams::default(), false);

    let mut out = buf(256);
    let n = src.work(&mut out)?;
    assert_eq!(n, 256);
    // The sim produces a counting ramp; all samples must arrive in order.
    for (i, sample) in out.iter().enumerate() {
        assert_eq!(sample.re, i as f32);
    }

    let n = src.work(&mut out)?;
    assert_eq!(n, 256);
    assert_eq!(out[0].re, 256.0);

    Ok(())
}

#[test]
fn transfer_buffer_reused_until_request_changes() -> Result<()> {
    let dev = SimReceiver::new();
    let recorder = dev.recorder();
    let mut src = Source::new(dev, SpParams::default(), false);

    src.work(&mut buf(512))?;
    src.work(&mut buf(512))?;
    src.work(&mut buf(1024))?;
    src.work(&mut buf(64))?;

    let acquires: Vec<(usize, usize)> = recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::Acquire { len, ptr, .. } => Some((len, ptr)),
            _ => None,
        })
        .collect();

    // Sized to exactly the requested count each time.
    let lens: Vec<usize> = acquires.iter().map(|(len, _)| *len).collect();
    assert_eq!(lens, vec![512, 512, 1024, 64]);
    // Same request, same allocation: no reallocation between the first two.
    assert_eq!(acquires[0].1, acquires[1].1);

    Ok(())
}

#[test]
fn fatal_acquire_fails_before_any_copy() {
    let mut dev = SimReceiver::new();
    dev.script_acquire(Status(-5));
    let mut src = Source::new(dev, SpParams::default(), false);

    let sentinel = Complex32::new(-1.0, -1.0);
    let mut out = vec![sentinel; 128];
    let err = src.work(&mut out).unwrap_err();

    match err {
        Error::Device { call, code, .. } => {
            assert_eq!(call, "SimReceiver::acquire");
            assert_eq!(code, -5);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Nothing may have been copied into the runtime buffer.
    assert!(out.iter().all(|s| *s == sentinel));
}

#[test]
fn warning_acquire_completes_normally() -> Result<()> {
    let mut dev = SimReceiver::new();
    // Positive status: e.g. uncalibrated data. Data still flows.
    dev.script_acquire(Status(4));
    let mut src = Source::new(dev, SpParams::default(), false);

    let mut out = buf(64);
    let n = src.work(&mut out)?;
    assert_eq!(n, 64);
    assert_eq!(out[63].re, 63.0);

    Ok(())
}

#[test]
fn fatal_apply_keeps_config_dirty_for_retry() -> Result<()> {
    let mut dev = SimReceiver::new();
    dev.script_apply(Status(-9));
    let recorder = dev.recorder();
    let mut src = Source::new(dev, SpParams::default(), false);

    let mut out = buf(32);
    assert!(src.work(&mut out).is_err());
    // The failed attempt must not have reached the acquire step.
    assert_eq!(
        recorder.count(|e| matches!(e, Event::Acquire { .. })),
        0
    );

    // The configuration is still pending; the next call retries it.
    src.work(&mut out)?;
    assert_eq!(recorder.count(|e| matches!(e, Event::Apply)), 2);
    assert_eq!(
        recorder.count(|e| matches!(e, Event::Acquire { .. })),
        1
    );

    Ok(())
}

#[test]
fn warning_apply_completes_normally() -> Result<()> {
    let mut dev = SimReceiver::new();
    // Clamped-setting warnings during reconfiguration do not stop streaming.
    dev.script_apply(Status(1));
    let mut src = Source::new(dev, SpParams::default(), false);

    let n = src.work(&mut buf(16))?;
    assert_eq!(n, 16);

    Ok(())
}

#[test]
fn drop_aborts_the_device_session() -> Result<()> {
    let dev = SimReceiver::new();
    let recorder = dev.recorder();
    let mut src = Source::new(dev, SpParams::default(), false);
    src.work(&mut buf(8))?;

    assert_eq!(recorder.count(|e| matches!(e, Event::Abort)), 0);
    drop(src);
    assert_eq!(recorder.count(|e| matches!(e, Event::Abort)), 1);

    Ok(())
}
