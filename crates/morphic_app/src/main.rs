use std::{error::Error, ops::Range, time::Duration};

use morphic_core::{LoadSettings, time::Time};
use morphic_renderer::{DrawCommands, GpuModel, MeshGroup, Model, MorphPushParameters};

const FRAME: Duration = Duration::from_micros(16_667);
const FRAMES: usize = 120;

/// Counts what the dispatcher would record, without a GPU.
#[derive(Default, Debug)]
struct DrawStats {
    binds: usize,
    pushes: usize,
    draws: usize,
    indices: u64,
}

impl DrawCommands for DrawStats {
    fn bind_vertex_buffer(&mut self, _group: MeshGroup, _byte_offset: u64) {
        self.binds += 1;
    }

    fn bind_index_buffer(&mut self, _group: MeshGroup) {
        self.binds += 1;
    }

    fn push_morph_parameters(&mut self, _parameters: &MorphPushParameters) {
        self.pushes += 1;
    }

    fn draw_indexed(&mut self, indices: Range<u32>, _base_vertex: i32) {
        self.draws += 1;
        self.indices += u64::from(indices.end - indices.start);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: morphic_app <model.gltf|model.glb> [settings.json]");
        std::process::exit(2);
    };
    let settings = match args.next() {
        Some(settings_path) => LoadSettings::from_file(settings_path)?,
        None => LoadSettings::default(),
    };

    let mut model = Model::load(&path, &settings).inspect_err(|e| {
        log::error!("Failed to load '{}': {}", path, e);
    })?;

    // 1. Run the animation clock headlessly
    let mut time = Time::default();
    for _ in 0..FRAMES {
        time.tick(FRAME);
        model.advance(time.delta_seconds());
    }
    for mesh in &model.morph_meshes {
        log::info!(
            "'{}' weights after {:.2}s: {:?}",
            mesh.name,
            time.elapsed_seconds(),
            &mesh.push.weights[..mesh.target_count.min(mesh.push.weights.len())]
        );
    }

    // 2. Dry-run the draw dispatcher
    let mut stats = DrawStats::default();
    model.draw_normal(&mut stats);
    model.draw_morph(&mut stats);
    log::info!(
        "Frame would issue {} draws ({} indices), {} binds, {} parameter pushes",
        stats.draws,
        stats.indices,
        stats.binds,
        stats.pushes
    );

    // 3. Upload if there is a GPU around
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }));
    match adapter {
        Ok(adapter) => {
            let (device, _queue) =
                pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))?;
            let gpu = GpuModel::upload(&device, &mut model);
            gpu.destroy();
        }
        Err(e) => log::warn!("No GPU adapter ({}), skipping upload", e),
    }

    Ok(())
}
