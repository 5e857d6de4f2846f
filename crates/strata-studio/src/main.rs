use std::f64::consts::PI;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use strata_engine::coords::Vec2;
use strata_engine::core::{run_frames, App, AppControl, FrameCtx, Renderer};
use strata_engine::logging::{init_logging, LoggingConfig};
use strata_engine::paint::{Color, ColorStop, LinearGradient, Paint, RadialGradient, Style};
use strata_engine::render::RendererConfig;
use strata_engine::scene::shapes::{BezierCurve, Circle, Ellipse, Line, Polyline, Rect, Sector};
use strata_engine::scene::{Node, NodeId, Storage};
use strata_engine::surface::{RasterSurface, Surface};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const SCATTER_POINTS: usize = 2_000;
const SCATTER_GENERATIONS: usize = 4;

/// Demo driver: builds a chart-like scene, hovers one bar, lets progressive
/// painting settle and then stops.
struct Studio {
    hover_at: Vec2,
    hovered: Option<NodeId>,
    min_frames: u64,
}

impl App<RasterSurface> for Studio {
    fn on_start(&mut self, renderer: &mut Renderer<RasterSurface>) {
        if let Err(err) = build_scene(renderer.storage_mut()) {
            log::error!("scene construction failed: {err:#}");
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, RasterSurface>) -> AppControl {
        let frame = ctx.frame;
        log::debug!(
            "frame {} dt={:?} refreshed={} progressive={} pending={}",
            frame.time.frame_index,
            frame.time.dt,
            frame.refreshed,
            frame.progressive_step,
            frame.pending
        );

        if self.hovered.is_none() && frame.refreshed {
            let hit = ctx.storage().hit_test(self.hover_at.x, self.hover_at.y);
            if let Some(id) = hit {
                ctx.renderer.add_hover(id, |s| {
                    s.stroke = Some(Paint::solid(Color::from_hex(0xffb000)));
                    s.line_width = 3.0;
                });
                self.hovered = Some(id);
                log::info!("hovering {id:?}");
            }
        }

        if frame.time.frame_index + 1 >= self.min_frames && !frame.pending {
            AppControl::Exit
        } else {
            AppControl::Continue
        }
    }
}

fn build_scene(storage: &mut Storage) -> Result<()> {
    let root = storage.insert(Node::group());
    storage.add_root(root)?;

    // Plot frame and gradient backdrop.
    let backdrop = LinearGradient::new(
        Vec2::new(0.0, 0.0),
        Vec2::new(0.0, 1.0),
        vec![
            ColorStop::new(0.0, Color::from_hex(0xf4f7fb)),
            ColorStop::new(1.0, Color::from_hex(0xdde5f0)),
        ],
    );
    let plot = Node::shape(Rect::new(40.0, 20.0, 560.0, 340.0).with_radius(8.0))
        .with_style(Style::filled(backdrop))
        .with_z(0, 0, 0);
    add(storage, root, plot)?;

    // Bars, clipped to the plot area.
    let bars = storage.insert(Node::group());
    storage.add_child(root, bars)?;
    let clip = storage.insert(Node::shape(Rect::new(40.0, 20.0, 560.0, 340.0)));
    storage.set_clip_path(bars, Some(clip))?;
    for (i, value) in [120.0, 260.0, 190.0, 360.0, 80.0, 230.0].into_iter().enumerate() {
        let x = 70.0 + i as f64 * 90.0;
        let bar = Node::shape(Rect::new(x, 360.0 - value, 50.0, value).with_radii([6.0, 6.0, 0.0, 0.0]))
            .with_style(Style::filled(Color::from_hex(0x3b82f6)))
            .with_z(0, 1, 0);
        add(storage, bars, bar)?;
    }

    // Trend line and annotations on their own layer.
    let points: Vec<Vec2> = (0..6)
        .map(|i| Vec2::new(95.0 + i as f64 * 90.0, 300.0 - (i as f64 * 0.9).sin() * 120.0))
        .collect();
    let mut trend = Style::stroked(Color::from_hex(0xef4444), 2.5);
    trend.line_dash = Some(vec![8.0, 4.0]);
    add(storage, root, Node::shape(Polyline::new(points)).with_style(trend).with_z(1, 0, 0))?;

    let guide = Style::stroked(Color::from_hex(0x64748b), 1.0);
    add(storage, root, Node::shape(Line::new(40.0, 360.0, 600.0, 360.0)).with_style(guide).with_z(1, 0, 0))?;

    let curve = BezierCurve::cubic(60.0, 60.0, 200.0, 0.0, 400.0, 120.0, 580.0, 50.0);
    add(storage, root, Node::shape(curve).with_z(1, 0, 1))?;

    // Legend: sector gauge and a halo.
    let halo = RadialGradient::new(
        Vec2::new(0.5, 0.5),
        0.5,
        vec![
            ColorStop::new(0.0, Color::from_hex(0x22c55e)),
            ColorStop::new(1.0, Color::TRANSPARENT),
        ],
    );
    add(storage, root, Node::shape(Circle::new(560.0, 70.0, 30.0)).with_style(Style::filled(halo)).with_z(1, 1, 0))?;
    let gauge = Node::shape(Sector::new(560.0, 70.0, 12.0, 22.0, -PI / 2.0, PI / 3.0))
        .with_style(Style::filled(Color::from_hex(0x15803d)))
        .with_z(1, 1, 1);
    add(storage, root, gauge)?;
    let badge = Node::shape(Ellipse::new(0.0, 0.0, 24.0, 10.0))
        .with_style(Style::filled(Color::rgba(15, 23, 42, 200)))
        .with_position(100.0, 50.0)
        .with_rotation(-PI / 12.0)
        .with_z(1, 1, 0);
    add(storage, root, badge)?;

    // Scatter cloud, painted progressively.
    let scatter = storage.insert(Node::group());
    storage.add_child(root, scatter)?;
    let per_generation = SCATTER_POINTS.div_ceil(SCATTER_GENERATIONS);
    for i in 0..SCATTER_POINTS {
        let t = i as f64 / SCATTER_POINTS as f64;
        let x = 50.0 + 540.0 * t;
        let y = 190.0 + (t * 37.0).sin() * 90.0 * (1.0 - t) + (t * 211.0).cos() * 20.0;
        let dot = Node::shape(Circle::new(x, y, 1.5))
            .with_style(Style::filled(Color::rgba(124, 58, 237, 160)))
            .with_z(2, 0, 0)
            .with_progressive((i / per_generation) as i32);
        add(storage, scatter, dot)?;
    }

    log::info!("scene built: {} node(s)", storage.len());
    Ok(())
}

fn add(storage: &mut Storage, parent: NodeId, node: Node) -> Result<NodeId> {
    let id = storage.insert(node);
    storage.add_child(parent, id)?;
    Ok(id)
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let output = std::env::args().nth(1).unwrap_or_else(|| "strata-studio.png".to_owned());

    let config = RendererConfig {
        width: WIDTH,
        height: HEIGHT,
        dpr: 2.0,
        background: Some(Paint::solid(Color::WHITE)),
        ..RendererConfig::default()
    };

    let mut renderer = Renderer::<RasterSurface>::new(&config);
    let mut studio = Studio {
        hover_at: Vec2::new(100.0, 330.0),
        hovered: None,
        min_frames: 3,
    };

    let t0 = Instant::now();
    let frames = (0..120u32).map(|i| t0 + Duration::from_millis(16) * i);
    let ticked = run_frames(&mut studio, &mut renderer, frames);
    log::info!("settled after {ticked} frame(s)");

    let image = renderer.snapshot().context("allocating export surface")?;
    image
        .save_png(&output)
        .with_context(|| format!("writing {output}"))?;
    log::info!("wrote {output} ({}x{})", image.width(), image.height());

    renderer.dispose();
    Ok(())
}
