use criterion::{Criterion, black_box, criterion_group, criterion_main};
use room_nav::{
    AdapterError, Command, Destination, Logger, NavigationDelegate, Navigator, NavigatorConfig,
    NullSink, RouteScreen, StackLogObserver,
};

struct Owner;

impl NavigationDelegate<RouteScreen, ()> for Owner {
    fn perform_exit(&mut self) {}
}

fn adapter(screen: &RouteScreen) -> Result<Destination<()>, AdapterError> {
    Ok(match screen.route.as_str() {
        route if route.starts_with("dialog") => Destination::Dialog(()),
        route if route.starts_with("popup") => Destination::Popup(()),
        _ => Destination::FullScreen(()),
    })
}

fn navigation_deep_stack(c: &mut Criterion) {
    c.bench_function("navigation_deep_stack", |b| {
        b.iter(|| {
            let mut navigator = Navigator::new(adapter, Owner);
            navigator
                .apply((0..200).map(|idx| Command::Forward(RouteScreen::new(format!("page-{idx}")))))
                .expect("forward");
            navigator
                .execute(Command::BackTo(Some(RouteScreen::new("page-0"))))
                .expect("back to");
            black_box(navigator.registered_count());
        });
    });
}

fn navigation_mixed_script(c: &mut Criterion) {
    c.bench_function("navigation_mixed_script", |b| {
        b.iter(|| {
            let logger = Logger::new(NullSink);
            let mut config = NavigatorConfig::default().with_logger(logger.clone());
            config.enable_metrics();
            let mut navigator = Navigator::with_config(adapter, Owner, config);
            navigator.add_observer(StackLogObserver::new(logger).log_popups(true));

            navigator.execute(Command::Forward(RouteScreen::new("home"))).expect("home");
            for round in 0..50 {
                navigator
                    .apply(scripted_round(round))
                    .expect("scripted round");
            }
            black_box(navigator.snapshot());
        });
    });
}

fn scripted_round(round: usize) -> Vec<Command<RouteScreen>> {
    vec![
        Command::Forward(RouteScreen::with_key(format!("list-{round}"), "list")),
        Command::Forward(RouteScreen::with_key(format!("popup-{}", round % 4), "popup")),
        Command::Forward(RouteScreen::with_key("dialog-filter", "dialog")),
        Command::back_press_handler(|| true),
        Command::Back,
        Command::Forward(RouteScreen::with_key(format!("detail-{round}"), "detail")),
        Command::Replace(RouteScreen::with_key(format!("edit-{round}"), "edit")),
        Command::Back,
        Command::Remove(RouteScreen::with_key(format!("list-{round}"), "list")),
    ]
}

criterion_group!(benches, navigation_deep_stack, navigation_mixed_script);
criterion_main!(benches);
