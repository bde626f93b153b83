//! Interactive Rebuild Walkthrough
//!
//! Drives an isosurface controller through the kind of event stream a viewer
//! would produce and prints what each rebuild did:
//! 1. Build a sphere from the squared-distance field
//! 2. Sweep the threshold over the sampled value range
//! 3. Refine the lattice
//! 4. Swap in the terrain field
//! 5. Compare the two indexing strategies
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --release --bin sphere_rebuild
//! ```

use instant::Instant;

use iso_rs::{
    fields, GeometryConfig, IndexingStrategy, IsoSurface, IsoSurfaceBuilder, MeshingConfig,
    NormalMode, ParameterEvent, Point3, RebuildReport, VertexCoord,
};

fn print_report(label: &str, report: &RebuildReport, elapsed_ms: f64) {
    println!(
        "  {:<24} {:>7} tris {:>7} verts  {:>8.2} ms  {:?}",
        label, report.triangle_count, report.vertex_count, elapsed_ms, report.trigger
    );
}

fn print_surface(surface: &IsoSurface) {
    let geometry = surface.geometry();
    let range = surface.value_range();
    let stats = surface.mesh().stats();
    println!(
        "  Lattice:         {}x{}x{} cells of {:.3}",
        geometry.resolution[0], geometry.resolution[1], geometry.resolution[2], geometry.cell_size
    );
    println!("  Value range:     [{:.4}, {:.4}]", range.min, range.max);
    println!("  Threshold:       {:.4}", surface.threshold());
    println!("  Triangles:       {}", stats.triangle_count);
    println!("  Vertices:        {}", stats.vertex_count);
    println!("  Surface area:    {:.4}", stats.surface_area);
    println!(
        "  Bounding box:    ({:.2}, {:.2}, {:.2}) → ({:.2}, {:.2}, {:.2})",
        stats.bbox_min.x,
        stats.bbox_min.y,
        stats.bbox_min.z,
        stats.bbox_max.x,
        stats.bbox_max.y,
        stats.bbox_max.z
    );
    println!();
}

fn header(title: &str) {
    println!("┌─────────────────────────────────────────────────────────────┐");
    println!("│ {:<60}│", title);
    println!("└─────────────────────────────────────────────────────────────┘");
}

fn main() {
    env_logger::init();

    println!("═══════════════════════════════════════════════════════════════");
    println!("          Isosurface Rebuild Walkthrough");
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    // =========================================================================
    // Step 1: Initial build
    // =========================================================================
    header("Step 1: Initial Build");

    let start = Instant::now();
    let mut surface = match IsoSurfaceBuilder::new()
        .field(fields::radial_squared(Point3::ZERO))
        .origin(Point3::splat(-2.0))
        .cell_size(0.5)
        .resolution(8, 8, 8)
        .threshold(1.0)
        .build()
    {
        Ok(surface) => surface,
        Err(e) => {
            eprintln!("Error building isosurface: {}", e);
            std::process::exit(1);
        }
    };
    println!("  Build time:      {:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
    for v in [VertexCoord::new(4, 4, 4), VertexCoord::new(9, 0, 0)] {
        match surface.lattice().vertex_sample(v) {
            Ok((p, value)) => println!("  Sample {:?}: {:.3} at {:?}", v, value, p),
            Err(e) => println!("  Sample {:?}: {}", v, e),
        }
    }
    print_surface(&surface);

    // =========================================================================
    // Step 2: Threshold sweep
    // =========================================================================
    header("Step 2: Threshold Sweep");

    let range = surface.value_range();
    for step in 0..=4 {
        let threshold = range.min + (range.max - range.min) * step as f32 / 8.0;
        let start = Instant::now();
        match surface.on_threshold_changed(threshold) {
            Ok(report) => print_report(
                &format!("threshold {:.3}", threshold),
                &report,
                start.elapsed().as_secs_f64() * 1000.0,
            ),
            Err(e) => eprintln!("  threshold {:.3} rejected: {}", threshold, e),
        }
    }

    // Rejected changes leave the last mesh in place
    if let Err(e) = surface.on_threshold_changed(f32::NAN) {
        println!("  NaN threshold rejected: {}", e);
    }
    println!();

    // =========================================================================
    // Step 3: Event stream
    // =========================================================================
    header("Step 3: Event Stream");

    let events = vec![
        ParameterEvent::SetThreshold(1.0),
        ParameterEvent::SetGeometry(GeometryConfig::centered(0.1, 40, 40, 40)),
        ParameterEvent::SetVisible(true),
        ParameterEvent::SetGeometry(GeometryConfig::new(Point3::ZERO, 0.0, 4, 4, 4)),
        ParameterEvent::SetField(Box::new(fields::terrain_bumps)),
        ParameterEvent::SetGeometry(GeometryConfig::new(Point3::ZERO, 0.05, 40, 20, 40)),
        ParameterEvent::SetThreshold(0.05),
    ];

    for event in events {
        let label = format!("{:?}", event);
        let start = Instant::now();
        match surface.handle(event) {
            Ok(Some(report)) => print_report(
                label.split('(').next().unwrap_or("event"),
                &report,
                start.elapsed().as_secs_f64() * 1000.0,
            ),
            Ok(None) => println!("  {}", label),
            Err(e) => println!("  {} rejected: {}", label, e),
        }
    }

    if let Some(wireframe) = surface.wireframe() {
        println!("  Wireframe edges: {}", wireframe.indices.len() / 2);
    }
    println!("  Rebuilds:        {}", surface.generation());
    println!();
    print_surface(&surface);

    // =========================================================================
    // Step 4: Indexing strategies
    // =========================================================================
    header("Step 4: Indexing Strategies");

    for (name, meshing) in [
        (
            "shared edges",
            MeshingConfig::new(IndexingStrategy::SharedEdges, NormalMode::AreaWeighted),
        ),
        (
            "per cell",
            MeshingConfig::new(IndexingStrategy::PerCell, NormalMode::AreaWeighted),
        ),
        (
            "shared + gradient",
            MeshingConfig::new(IndexingStrategy::SharedEdges, NormalMode::FieldGradient),
        ),
    ] {
        let start = Instant::now();
        let report = surface.on_meshing_changed(meshing);
        print_report(name, &report, start.elapsed().as_secs_f64() * 1000.0);
    }
    println!();

    log::info!("walkthrough finished after {} rebuilds", surface.generation());
    let buffers = surface.take_buffers();
    println!(
        "  Handed off {} positions, {} triangles",
        buffers.positions.len(),
        buffers.triangle_count()
    );
}
