use etherparse::Ipv4HeaderSlice;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use tracing::{error, info, trace};
use tunwire::{Device, PacketBuf, Result, Tun, Udp};

// MTU + headroom
const BUF_CAPACITY: usize = 1504;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!(
            "usage: {} <tun-name|-> <local-port> <peer-addr> <peer-port>",
            args[0]
        );
        return ExitCode::FAILURE;
    }

    let Ok(local_port) = args[2].parse::<u16>() else {
        eprintln!("{}: local-port must be a port number", args[0]);
        return ExitCode::FAILURE;
    };
    let Ok(peer_port) = args[4].parse::<u16>() else {
        eprintln!("{}: peer-port must be a port number", args[0]);
        return ExitCode::FAILURE;
    };

    match run(&args[1], local_port, &args[3], peer_port) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(tun_name: &str, local_port: u16, peer_addr: &str, peer_port: u16) -> Result<()> {
    // "-" lets the kernel pick a tunN name
    let requested = if tun_name == "-" { None } else { Some(tun_name) };
    let tun = Arc::new(Tun::create(requested)?);

    let mut udp = Udp::bind(local_port)?;
    udp.connect(peer_addr, peer_port)?;
    let udp = Arc::new(udp);

    info!(
        device = %tun.name(),
        local_port = udp.local_port(),
        peer = %format!("{peer_addr}:{peer_port}"),
        "tunnel up"
    );

    // Both directions block, so each gets its own thread.
    let tun_side = Arc::clone(&tun);
    let udp_side = Arc::clone(&udp);
    thread::spawn(move || {
        if let Err(err) = forward(&*tun_side, &*udp_side, "tun -> udp") {
            error!("tun -> udp: {err}");
        }
    });

    forward(&*udp, &*tun, "udp -> tun")
}

fn forward(from: &dyn Device, to: &dyn Device, dir: &str) -> Result<()> {
    let mut buf = PacketBuf::with_capacity(BUF_CAPACITY);
    loop {
        from.recv(&mut buf)?;
        if let Ok(ip) = Ipv4HeaderSlice::from_slice(buf.as_slice()) {
            trace!(
                "{dir}: {} -> {} ({} bytes)",
                ip.source_addr(),
                ip.destination_addr(),
                buf.len()
            );
        }
        to.send(&buf)?;
    }
}
