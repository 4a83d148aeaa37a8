use std::path::Path;

use console::Style;
use pansharp_core::config::SharpenJob;
use pansharp_core::error::Result;
use pansharp_core::quality::{MetricValue, QualityMetric};
use pansharp_core::sharpen::SharpenMethod;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    error: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            error: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

pub fn print_job_summary(job: &SharpenJob, output: &Path, engine_name: &str) {
    let s = Styles::new();
    print_title(&s, "Pan-sharpening Job");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Engine"),
        s.method.apply_to(engine_name)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Method"),
        s.method.apply_to(&job.sharpening)
    );
    print_method_params(&s, &job.sharpening);
    println!();

    println!("  {}", s.header.apply_to("Bands"));
    for source in &job.bands {
        let reference = source.spatial_ref();
        println!(
            "    {:<12}{}  {}",
            s.label.apply_to(&source.name),
            s.value.apply_to(format!("{} m, {}", reference.scale, reference.crs)),
            s.path.apply_to(source.path.display())
        );
    }
    println!();
}

fn print_method_params(s: &Styles, method: &SharpenMethod) {
    let pan = match method {
        SharpenMethod::Ihs(c) => &c.pan_band,
        SharpenMethod::Brovey(c) => &c.pan_band,
        SharpenMethod::SimpleMean(c) => &c.pan_band,
        SharpenMethod::Pca(c) => &c.pan_band,
        SharpenMethod::GramSchmidt(c) => &c.pan_band,
    };
    println!("    {:<12}{}", s.label.apply_to("Pan"), s.value.apply_to(pan));

    match method {
        SharpenMethod::Brovey(c) => {
            let w = c.weights();
            println!(
                "    {:<12}{}",
                s.label.apply_to("Weights"),
                s.value.apply_to(format!(
                    "R {:.3}  G {:.3}  B {:.3}",
                    w.red, w.green, w.blue
                ))
            );
        }
        SharpenMethod::Pca(c) => {
            let params = c.params();
            println!(
                "    {:<12}{}",
                s.label.apply_to("Substitute"),
                s.value.apply_to(format!("PC{}", params.substitute_pc))
            );
            let matching = if params.match_pan { "mean/std" } else { "min/max" };
            println!(
                "    {:<12}{}",
                s.label.apply_to("Matching"),
                s.value.apply_to(matching)
            );
        }
        _ => {}
    }
}

pub fn print_quality_table(results: &[(QualityMetric, Result<MetricValue>)], bands: &[String]) {
    let s = Styles::new();
    print_title(&s, "Fusion Quality");

    for (metric, result) in results {
        match result {
            Ok(MetricValue::Aggregate(v)) => {
                println!(
                    "  {:<8}{}",
                    s.label.apply_to(metric),
                    s.value.apply_to(format!("{v:.6}"))
                );
            }
            Ok(MetricValue::PerBand(values)) => {
                println!("  {}", s.header.apply_to(metric));
                for (band, v) in bands.iter().zip(values) {
                    println!(
                        "    {:<12}{}",
                        s.label.apply_to(band),
                        s.value.apply_to(format!("{v:.6}"))
                    );
                }
            }
            Err(e) => {
                println!(
                    "  {:<8}{}",
                    s.label.apply_to(metric),
                    s.error.apply_to(format!("undefined ({e})"))
                );
            }
        }
    }
    println!();
}
