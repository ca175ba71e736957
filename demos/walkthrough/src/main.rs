use dmdrv::{InterfaceVersion, OpenFlags, TableConfig};
use log::info;

pub mod mem;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    dmdrv::init();
    dmdrv::register_add(mem::register());

    let config = TableConfig::new()
        .with("major", "10")
        .with("prefill", "hello, ");

    let (ctx, num) = dmdrv::create("mem", InterfaceVersion::V1_0, &config).unwrap();
    info!("created mem device, dev num {num}");

    let writer = dmdrv::open(ctx, OpenFlags::WriteOnly).unwrap();
    dmdrv::ioctl(ctx, writer, mem::SEEK_SET, 7).unwrap();
    let n = dmdrv::write(ctx, writer, b"driver").unwrap();
    dmdrv::flush(ctx, writer).unwrap();
    info!("wrote {n} bytes");

    let reader = dmdrv::open(ctx, OpenFlags::ReadOnly).unwrap();
    let st = dmdrv::stat(ctx, reader).unwrap();
    let mut buf = vec![0u8; st.size as usize];
    let n = dmdrv::read(ctx, reader, &mut buf).unwrap();
    info!("read {n} bytes: {:?}", String::from_utf8_lossy(&buf[..n]));
    assert_eq!(&buf[..n], b"hello, driver");

    // A second instance of the same type gets its own minor.
    let (ctx2, num2) = dmdrv::create("mem", InterfaceVersion::V1_0, &config).unwrap();
    info!("second instance dev num {num2}");
    assert_ne!(num2.minor(), num.minor());
    dmdrv::free(ctx2).unwrap();

    dmdrv::close(ctx, reader).unwrap();
    dmdrv::close(ctx, writer).unwrap();
    dmdrv::free(ctx).unwrap();
    info!("done");
}
