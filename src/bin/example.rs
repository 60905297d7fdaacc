use euler_tour_tree::tour::Tour;

/// A minimal `log::Log` that writes to stderr, gated on `RUST_LOG` (unset or
/// `off` disables it entirely). Avoids pulling in a logging-backend
/// dependency just for a demo binary.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }
    fn log(&self, record: &log::Record) {
        eprintln!("[{}] {}", record.level(), record.args());
    }
    fn flush(&self) {}
}

fn install_logger() {
    let level = match std::env::var("RUST_LOG").as_deref() {
        Ok("trace") => log::LevelFilter::Trace,
        Ok("debug") => log::LevelFilter::Debug,
        Ok("off") | Err(_) => log::LevelFilter::Off,
        Ok(_) => log::LevelFilter::Info,
    };
    if level == log::LevelFilter::Off {
        return;
    }
    log::set_boxed_logger(Box::new(StderrLogger)).expect("logger already installed");
    log::set_max_level(level);
}

fn main() {
    install_logger();

    let mut tour: Tour<i32> = Tour::new();
    for v in 1..=5 {
        tour.create_vertex(v);
    }
    println!("Created vertices 1..=5");

    tour.link(&1, &2);
    tour.link(&2, &3);
    tour.link(&3, &4);
    tour.link(&4, &5);
    println!("Linked a path 1-2-3-4-5");
    println!("connected(1, 5) = {}", tour.connected(&1, &5));
    println!("size(3) = {}", tour.size(&3));
    println!("components = {}", tour.n_components());

    tour.make_root(&3);
    println!("make_root(3); find_root(3) = {:?}", tour.find_root(&3));

    let mut component: Vec<_> = tour.nodes_in_component(&3);
    component.sort();
    println!("component of 3 = {component:?}");

    tour.cut(&3, &4);
    println!("Cut edge (3, 4)");
    println!("connected(1, 5) = {}", tour.connected(&1, &5));
    println!("size(1) = {}, size(5) = {}", tour.size(&1), tour.size(&5));
    println!("components = {}", tour.n_components());
}
