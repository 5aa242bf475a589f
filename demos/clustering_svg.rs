use clustervis::{Engine, FixedEntropy, Frame, FrameLog, NoDelay, PointSet};
use plotters::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Define the output file and dimensions
    let filename = "clustering.svg";
    let root = SVGBackend::new(filename, (1024, 768)).into_drawing_area();

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Incremental DBSCAN clustering", ("sans-serif", 20))
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(0.0..1024.0, 0.0..768.0)?;

    chart.configure_mesh().disable_mesh().draw()?;

    // Scatter a few dense blobs plus uniform background noise
    let mut rng = StdRng::seed_from_u64(7);
    let mut points = PointSet::new();
    for _ in 0..5 {
        let cx = rng.gen_range(100.0..900.0);
        let cy = rng.gen_range(100.0..650.0);
        for _ in 0..40 {
            points.add(
                cx + rng.gen_range(-60.0..60.0),
                cy + rng.gen_range(-60.0..60.0),
            );
        }
    }
    for _ in 0..60 {
        points.add(rng.gen_range(0.0..1024.0), rng.gen_range(0.0..768.0));
    }

    // Run the engine to completion with no playback delays
    let mut engine = Engine::with_entropy(FixedEntropy(7));
    engine.set_parameters(40.0, 5)?;
    let mut sink = FrameLog::new();
    engine.run(&points, &mut sink, &mut NoDelay::new())?;

    // Draw unclustered points first, as hollow grey circles
    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new((p.x, p.y), 3, BLACK.mix(0.3))),
    )?;

    // Replay the frame stream: halos below, markers on top
    for frame in sink.frames() {
        if let Frame::Halo {
            x,
            y,
            radius,
            color,
            opacity,
        } = *frame
        {
            let fill = RGBColor(color.r, color.g, color.b).mix(opacity);
            chart.draw_series(std::iter::once(Circle::new(
                (x, y),
                radius as i32,
                fill.filled(),
            )))?;
        }
    }
    for frame in sink.frames() {
        if let Frame::Marker { x, y, color } = *frame {
            let fill = RGBColor(color.r, color.g, color.b);
            chart.draw_series(std::iter::once(Circle::new((x, y), 4, fill.filled())))?;
        }
    }

    root.present()?;
    println!("Wrote {}", filename);

    Ok(())
}
