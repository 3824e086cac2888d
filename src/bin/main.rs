use sockaccept::application::config::loader::ConfigLoader;
use sockaccept::application::server::accept_server::AcceptServer;
use sockaccept::common::logger;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

extern "C" fn on_shutdown_signal(_signal: libc::c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

fn install_signal_handlers() {
    let handler = on_shutdown_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
    unsafe {
        libc::signal(libc::SIGINT, handler);
        libc::signal(libc::SIGTERM, handler);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config_file>", args[0]);
        std::process::exit(1);
    }

    let config = match ConfigLoader::load(&args[1]) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config file: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logger::init(&config.log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let server = match AcceptServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "failed to start");
            std::process::exit(1);
        }
    };

    install_signal_handlers();
    let abort = server.abort_flag();
    // Signal handlers may only touch the static; this thread forwards it.
    thread::spawn(move || {
        while !SHUTDOWN.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(50));
        }
        abort.abort();
    });

    let summary = server.run();
    let record = server.telemetry().snapshot();
    tracing::info!(
        accepted = summary.accepted,
        errors = summary.errors,
        idle_wakeups = record.loop_counter,
        last = ?summary.last,
        "server stopped"
    );
}
