use console::Style;
use heliostack_core::pipeline::config::RunConfig;
use heliostack_core::pipeline::{FrameOutcome, RunReport};

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    path: Style,
    warn: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            path: Style::new().underlined(),
            warn: Style::new().yellow(),
        }
    }
}

pub fn print_run_summary(config: &RunConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Heliostack Run"));
    println!();
    println!(
        "  {:<14}{} .. {} ({}h)",
        s.label.apply_to("Range"),
        s.value.apply_to(&config.start),
        s.value.apply_to(&config.end),
        config.interval_hours
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Body"),
        s.value.apply_to(&config.body)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Instrument"),
        s.value.apply_to(&config.instrument)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Data dir"),
        s.path.apply_to(config.data_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Results"),
        s.path.apply_to(config.results_dir.display())
    );
    println!(
        "  {:<14}{} px crop, {} px grid, {:.1}\"/px",
        s.label.apply_to("Geometry"),
        config.crop_size,
        config.upsample_size,
        config.pixel_scale
    );
    println!();
}

pub fn print_report(report: &RunReport) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{} stacked, {} skipped",
        s.label.apply_to("Frames"),
        s.value.apply_to(report.stacked_count()),
        report.skipped_count()
    );
    for frame in &report.frames {
        if let FrameOutcome::Skipped { reason } = &frame.outcome {
            println!(
                "    {} {}: {}",
                s.warn.apply_to("skipped"),
                frame.timestamp,
                reason
            );
        }
    }
    for (mode, path) in &report.outputs {
        println!(
            "  {:<14}{}",
            s.label.apply_to(format!("{mode} stack")),
            s.path.apply_to(path.display())
        );
    }
    println!();
}
