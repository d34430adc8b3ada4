//! Generator adapter: submit/flush ordering and failure behavior.

use anyhow::Result;
use signal_hound::blocks::vsg::VsgParams;
use signal_hound::blocks::Sink;
use signal_hound::blocks::SinkBlock;
use signal_hound::device::sim::Event;
use signal_hound::device::sim::SimTransmitter;
use signal_hound::device::TxInfo;
use signal_hound::Complex32;
use signal_hound::Status;

fn ramp(n: usize) -> Vec<Complex32> {
    (0..n).map(|i| Complex32::new(i as f32, -(i as f32))).collect()
}

#[test]
fn consumes_the_full_input_and_flushes() -> Result<()> {
    let dev = SimTransmitter::new();
    let recorder = dev.recorder();
    let transmitted = dev.transmitted();
    let mut snk = Sink::new(dev, VsgParams::default());

    let input = ramp(300);
    let n = snk.work(&input)?;
    assert_eq!(n, 300);
    assert_eq!(transmitted.samples(), input);

    // Configuration goes out first, then submit, then flush.
    assert_eq!(
        recorder.events(),
        vec![Event::Apply, Event::Transmit { len: 300 }, Event::Flush]
    );

    Ok(())
}

#[test]
fn reconfigures_only_after_a_setter() -> Result<()> {
    let dev = SimTransmitter::new();
    let applied = dev.applied();
    let mut snk = Sink::new(dev, VsgParams::default());
    let handle = snk.handle();

    let input = ramp(64);
    snk.work(&input)?;
    snk.work(&input)?;
    assert_eq!(applied.len(), 1);

    handle.set_level(-10.0);
    snk.work(&input)?;
    assert_eq!(applied.len(), 2);
    assert_eq!(applied.last().unwrap().level, -10.0);

    Ok(())
}

#[test]
fn setters_merge_last_write_wins() -> Result<()> {
    let dev = SimTransmitter::new();
    let applied = dev.applied();
    let mut snk = Sink::new(dev, VsgParams::default());
    let handle = snk.handle();

    handle.set_center(2.4e9);
    handle.set_sample_rate(10.0e6);
    handle.set_i_offset(12);
    handle.set_q_offset(-7);
    handle.set_center(915.0e6);

    snk.work(&ramp(16))?;

    let cfg = applied.last().unwrap();
    assert_eq!(cfg.center, 915.0e6);
    assert_eq!(cfg.sample_rate, 10.0e6);
    assert_eq!(cfg.i_offset, 12);
    assert_eq!(cfg.q_offset, -7);
    assert_eq!(applied.len(), 1);

    Ok(())
}

#[test]
fn fatal_transmit_fails_without_flush() {
    let mut dev = SimTransmitter::new();
    dev.script_transmit(Status(-3));
    let recorder = dev.recorder();
    let transmitted = dev.transmitted();
    let mut snk = Sink::new(dev, VsgParams::default());

    assert!(snk.work(&ramp(32)).is_err());
    assert!(transmitted.is_empty());
    assert_eq!(recorder.count(|e| matches!(e, Event::Flush)), 0);
}

#[test]
fn warning_transmit_completes_normally() -> Result<()> {
    let mut dev = SimTransmitter::new();
    dev.script_transmit(Status(2));
    let mut snk = Sink::new(dev, VsgParams::default());

    let n = snk.work(&ramp(48))?;
    assert_eq!(n, 48);

    Ok(())
}

#[test]
fn achieved_output_parameters_are_reported() -> Result<()> {
    let info = TxInfo {
        frequency: 915.0e6,
        sample_rate: 12.5e6,
        level: -11.5,
        offset: (3, -2),
    };
    let dev = SimTransmitter::with_info(info);
    let mut snk = Sink::new(dev, VsgParams::default());

    assert_eq!(snk.tx_info(), None);
    snk.work(&ramp(8))?;
    assert_eq!(snk.tx_info(), Some(info));

    Ok(())
}

#[test]
fn drop_aborts_the_device_session() {
    let dev = SimTransmitter::<VsgParams>::new();
    let recorder = dev.recorder();
    let snk = Sink::new(dev, VsgParams::default());
    drop(snk);
    assert_eq!(recorder.count(|e| matches!(e, Event::Abort)), 1);
}
