//! Pending-configuration protocol, driven against simulated devices.

use anyhow::Result;
use signal_hound::blocks::sm::SmParams;
use signal_hound::blocks::Source;
use signal_hound::blocks::SourceBlock;
use signal_hound::device::sim::Event;
use signal_hound::device::sim::SimReceiver;
use signal_hound::Complex32;

fn buf(n: usize) -> Vec<Complex32> {
    vec![Complex32::new(0.0, 0.0); n]
}

#[test]
fn first_work_applies_initial_config() -> Result<()> {
    let dev = SimReceiver::new();
    let applied = dev.applied();
    let params = SmParams {
        center: 5.8e9,
        ..SmParams::default()
    };
    let mut src = Source::new(dev, params.clone(), false);

    assert!(applied.is_empty());

    let mut out = buf(512);
    src.work(&mut out)?;
    assert_eq!(applied.len(), 1);
    assert_eq!(applied.last(), Some(params));

    // No setter ran in between: the second call must not reconfigure.
    src.work(&mut out)?;
    assert_eq!(applied.len(), 1);

    Ok(())
}

#[test]
fn setters_merge_last_write_wins() -> Result<()> {
    let dev = SimReceiver::new();
    let applied = dev.applied();
    let mut src = Source::new(dev, SmParams::default(), false);
    let handle = src.handle();

    handle.set_center(1.0e9);
    handle.set_center(2.45e9);
    handle.set_ref_level(-30.0);

    src.work(&mut buf(64))?;

    let cfg = applied.last().unwrap();
    assert_eq!(cfg.center, 2.45e9);
    assert_eq!(cfg.ref_level, -30.0);
    // Fields no setter touched keep their initial values.
    assert_eq!(cfg.atten, SmParams::default().atten);
    assert_eq!(cfg.bandwidth, SmParams::default().bandwidth);
    assert_eq!(applied.len(), 1);

    Ok(())
}

#[test]
fn setter_while_streaming_reconfigures_at_next_boundary() -> Result<()> {
    let dev = SimReceiver::new();
    let applied = dev.applied();
    let mut src = Source::new(dev, SmParams::default(), false);
    let handle = src.handle();

    let mut out = buf(128);
    src.work(&mut out)?;
    assert_eq!(applied.len(), 1);

    handle.set_atten(3);
    src.work(&mut out)?;
    assert_eq!(applied.len(), 2);
    assert_eq!(applied.last().unwrap().atten, 3);

    Ok(())
}

#[test]
fn setters_race_from_other_threads() -> Result<()> {
    let dev = SimReceiver::new();
    let applied = dev.applied();
    let mut src = Source::new(dev, SmParams::default(), false);

    let h1 = src.handle();
    let h2 = src.handle();
    let t1 = std::thread::spawn(move || {
        for i in 0..100 {
            h1.set_center(1.0e9 + f64::from(i));
        }
    });
    let t2 = std::thread::spawn(move || {
        for i in 0..100 {
            h2.set_bandwidth(1.0e6 + f64::from(i));
        }
    });
    t1.join().unwrap();
    t2.join().unwrap();

    src.work(&mut buf(64))?;

    // Each field independently holds its last written value.
    let cfg = applied.last().unwrap();
    assert_eq!(cfg.center, 1.0e9 + 99.0);
    assert_eq!(cfg.bandwidth, 1.0e6 + 99.0);
    assert_eq!(applied.len(), 1);

    Ok(())
}

#[test]
fn purge_setter_does_not_mark_dirty() -> Result<()> {
    let dev = SimReceiver::new();
    let applied = dev.applied();
    let recorder = dev.recorder();
    let mut src = Source::new(dev, SmParams::default(), false);
    let handle = src.handle();

    let mut out = buf(32);
    src.work(&mut out)?;
    handle.set_purge(true);
    src.work(&mut out)?;

    assert_eq!(applied.len(), 1);
    let purges: Vec<bool> = recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::Acquire { purge, .. } => Some(purge),
            _ => None,
        })
        .collect();
    assert_eq!(purges, vec![false, true]);

    Ok(())
}

#[test]
fn achieved_parameters_are_reported() -> Result<()> {
    use signal_hound::device::StreamInfo;

    let info = StreamInfo {
        sample_rate: 12.5e6,
        bandwidth: 10.0e6,
    };
    let dev = SimReceiver::with_info(info);
    let mut src = Source::new(dev, SmParams::default(), false);

    assert_eq!(src.stream_info(), None);
    src.work(&mut buf(16))?;
    assert_eq!(src.stream_info(), Some(info));

    Ok(())
}
