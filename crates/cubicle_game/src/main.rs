//! Cubicle Office: main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Simulation runs in
//! `RedrawRequested` on a fixed timestep (see `TimeState`):
//!
//!   1. `begin_frame()` measures wall-clock delta and feeds the accumulator
//!   2. `while should_step()` advances the office `World` by fixed slices
//!   3. the sprite mesh is rebuilt from `World::draw_list`
//!   4. camera upload, one atlas draw call, then the egui help text and panel

mod animation;
mod collision;
mod config;
mod error;
mod interaction;
mod level;
mod player;
mod world;

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use config::GameConfig;
use cubicle_core::atlas::PackedAtlas;
use cubicle_core::input::{InputState, Key};
use cubicle_core::palette;
use cubicle_core::time::TimeState;
use cubicle_devtools::{DebugOverlay, OverlayStats};
use cubicle_platform::window::PlatformConfig;
use cubicle_render::{Camera2D, GpuContext, SpritePipeline, SpriteVertex, Texture};
use world::{SpriteInstance, World};

/// All mutable engine state. Built in `ApplicationHandler::resumed` once the
/// window and GPU surface exist.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: Camera2D,
    sprite_pipeline: SpritePipeline,
    debug_overlay: DebugOverlay,
    world: World,
    show_collision_debug: bool,

    atlas_texture: Texture,
    atlas_bind_group: wgpu::BindGroup,

    // The mesh is rebuilt on the CPU each frame and streamed into these
    // buffers. They grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    index_count: u32,
    sprite_count: usize,
}

impl EngineState {
    fn new(window: Arc<Window>, config: &GameConfig) -> Result<Self, String> {
        let world = World::init(config).map_err(|err| format!("office scene: {err}"))?;

        let gpu = GpuContext::new(window.clone())?;
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);
        let camera =
            Camera2D::anchored_top_left(gpu.size.0, gpu.size.1, window.scale_factor() as f32);

        let atlas_texture =
            Texture::from_image(&gpu.device, &gpu.queue, &world.atlas.image, "Office Atlas");
        let atlas_bind_group =
            sprite_pipeline.create_texture_bind_group(&gpu.device, &atlas_texture);

        let camera_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<cubicle_render::CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);

        let mesh_vertex_capacity = 2048;
        let mesh_index_capacity = 4096;
        let vertex_buffer = create_vertex_buffer(&gpu.device, mesh_vertex_capacity);
        let index_buffer = create_index_buffer(&gpu.device, mesh_index_capacity);

        let mut state = Self {
            window,
            gpu,
            time: TimeState::new(),
            input: InputState::new(),
            camera,
            sprite_pipeline,
            debug_overlay,
            world,
            show_collision_debug: false,
            atlas_texture,
            atlas_bind_group,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity,
            mesh_index_capacity,
            index_count: 0,
            sprite_count: 0,
        };
        state.rebuild_mesh();
        Ok(state)
    }

    fn estimate_memory_mb(&self) -> f32 {
        let (w, h) = self.atlas_texture.size;
        let mut bytes = (w as usize) * (h as usize) * 4;
        bytes += self.mesh_vertex_capacity * std::mem::size_of::<SpriteVertex>();
        bytes += self.mesh_index_capacity * std::mem::size_of::<u32>();
        bytes as f32 / (1024.0 * 1024.0)
    }

    fn overlay_stats(&self) -> OverlayStats {
        let player = &self.world.player;
        let position = player.position();
        OverlayStats {
            draw_calls: u32::from(self.index_count > 0),
            sprite_count: self.sprite_count as u32,
            memory_estimate_mb: self.estimate_memory_mb(),
            texture_count: self.world.textures.len(),
            player_position: (position.x, position.y),
            player_velocity: (player.velocity.x, player.velocity.y),
            facing: player.facing.label().to_string(),
            posture: match player.seat() {
                Some(chair) => format!("sitting (chair {})", chair.0),
                None => "standing".to_string(),
            },
            contacts: player.contacts.describe(),
            doors_open: self.world.doors_open(),
            door_count: self.world.level.doors.len(),
            chair_count: self.world.level.chairs.len(),
            collision_debug: self.show_collision_debug,
        }
    }

    fn rebuild_mesh(&mut self) {
        let (vertices, indices) = self.build_mesh();
        self.ensure_mesh_capacity(vertices.len(), indices.len());
        self.sprite_count = vertices.len() / 4;
        self.index_count = indices.len() as u32;

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
    }

    fn build_mesh(&self) -> (Vec<SpriteVertex>, Vec<u32>) {
        let mut sprites = self.world.draw_list();
        if self.show_collision_debug {
            sprites.extend(self.world.collision_debug_list());
        }

        let mut vertices = Vec::with_capacity(sprites.len() * 4);
        let mut indices = Vec::with_capacity(sprites.len() * 6);
        for sprite in &sprites {
            add_quad(&mut vertices, &mut indices, &self.world.atlas, sprite);
        }
        (vertices, indices)
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn toggle_collision_debug(&mut self) {
        self.show_collision_debug = !self.show_collision_debug;
        log::info!(
            "Collision debug: {}",
            if self.show_collision_debug { "ON" } else { "OFF" }
        );
    }
}

struct App {
    platform: PlatformConfig,
    game: GameConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            platform: PlatformConfig::default(),
            game: GameConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = match cubicle_platform::window::create_window(event_loop, &self.platform) {
            Ok(window) => window,
            Err(err) => {
                log::error!("{err}");
                event_loop.exit();
                return;
            }
        };
        log::info!(
            "Window created: {}x{}",
            self.platform.width,
            self.platform.height
        );
        match EngineState::new(window, &self.game) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("Startup failed: {err}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Focused(false) => state.input.release_all(),

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    if state.gpu.resize(w, h) {
                        log::info!("Resized to {}x{}", w, h);
                    }
                    state.camera = Camera2D::anchored_top_left(
                        w,
                        h,
                        state.window.scale_factor() as f32,
                    );
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(engine_key) = map_key(key_code) {
                        apply_key_event(&mut state.input, engine_key, event.state, egui_consumed);
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                if state.input.is_just_pressed(Key::Escape) {
                    event_loop.exit();
                    return;
                }

                state.time.begin_frame();
                let dt = state.time.fixed_dt as f32;
                while state.time.should_step() {
                    if state.time.steps_this_frame == 1 {
                        if state.input.is_just_pressed(Key::F3) {
                            state.debug_overlay.toggle();
                        }
                        if state.input.is_just_pressed(Key::F4) {
                            state.toggle_collision_debug();
                        }
                    }

                    state.world.tick(dt, &state.input);

                    // Edges belong to the first step only; later steps in
                    // the same frame see held keys without a fresh press.
                    if state.time.steps_this_frame == 1 {
                        state.input.end_frame();
                    }
                }

                state.rebuild_mesh();

                let camera_uniform = state.camera.build_uniform();
                state.gpu.queue.write_buffer(
                    &state.camera_buffer,
                    0,
                    bytemuck::cast_slice(&[camera_uniform]),
                );

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let stats = state.overlay_stats();
                let (egui_primitives, egui_textures_delta, overlay_actions) =
                    state.debug_overlay.prepare(
                        &state.window,
                        &state.time,
                        state.world.help_text(),
                        Some(stats),
                    );

                if overlay_actions.toggle_collision_debug {
                    state.toggle_collision_debug();
                }
                if overlay_actions.respawn_player {
                    state.world.respawn_player();
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let [r, g, b, a] = palette::to_linear_f64(palette::FLOOR);
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Office Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });

                    if state.index_count > 0 {
                        render_pass.set_pipeline(&state.sprite_pipeline.render_pipeline);
                        render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                        render_pass.set_bind_group(1, &state.atlas_bind_group, &[]);
                        render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                        render_pass.set_index_buffer(
                            state.index_buffer.slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        render_pass.draw_indexed(0..state.index_count, 0, 0..1);
                    }
                }

                state.debug_overlay.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .debug_overlay
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.debug_overlay.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Office Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Office Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Appends one quad for `sprite`. World space is y-down, so the quad's first
/// vertex is its top-left corner and takes the top of the atlas rect.
fn add_quad(
    vertices: &mut Vec<SpriteVertex>,
    indices: &mut Vec<u32>,
    atlas: &PackedAtlas,
    sprite: &SpriteInstance,
) {
    let Some(entry) = atlas.resolve(sprite.texture.name()) else {
        log::warn!("No atlas entry for '{}'", sprite.texture.name());
        return;
    };
    let [u0, v0, u1, v1] = entry.uv;
    let half = sprite.size * 0.5;
    let (cx, cy) = (sprite.center.x, sprite.center.y);
    let base_index = vertices.len() as u32;

    for (position, tex_coords) in [
        ([cx - half.x, cy - half.y], [u0, v0]),
        ([cx + half.x, cy - half.y], [u1, v0]),
        ([cx + half.x, cy + half.y], [u1, v1]),
        ([cx - half.x, cy + half.y], [u0, v1]),
    ] {
        vertices.push(SpriteVertex {
            position,
            tex_coords,
            color: sprite.tint,
        });
    }

    indices.extend_from_slice(&[
        base_index,
        base_index + 1,
        base_index + 2,
        base_index,
        base_index + 2,
        base_index + 3,
    ]);
}

/// Presses egui consumed (a focused button taking Space) never reach the
/// game. Releases always do, or the key would stay held.
fn apply_key_event(input: &mut InputState, key: Key, state: ElementState, egui_consumed: bool) {
    match state {
        ElementState::Pressed if !egui_consumed => input.key_down(key),
        ElementState::Pressed => {}
        ElementState::Released => input.key_up(key),
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::F4 => Some(Key::F4),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Cubicle Office starting...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubicle_core::office_art::OfficeTexture;
    use glam::Vec2;

    fn atlas() -> PackedAtlas {
        World::init(&GameConfig::default())
            .expect("world")
            .atlas
    }

    #[test]
    fn quad_uses_atlas_rect_top_down() {
        let atlas = atlas();
        let entry = *atlas.resolve("chair").expect("chair entry");
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let sprite = SpriteInstance {
            texture: OfficeTexture::Chair,
            center: Vec2::new(100.0, 140.0),
            size: Vec2::splat(32.0),
            tint: [1.0; 4],
        };
        add_quad(&mut vertices, &mut indices, &atlas, &sprite);

        assert_eq!(vertices.len(), 4);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(vertices[0].position, [84.0, 124.0]);
        assert_eq!(vertices[0].tex_coords, [entry.uv[0], entry.uv[1]]);
        assert_eq!(vertices[2].position, [116.0, 156.0]);
        assert_eq!(vertices[2].tex_coords, [entry.uv[2], entry.uv[3]]);
    }

    #[test]
    fn stretched_desk_keeps_full_texture() {
        let atlas = atlas();
        let entry = *atlas.resolve("desk").expect("desk entry");
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let sprite = SpriteInstance {
            texture: OfficeTexture::Desk,
            center: Vec2::new(625.0, 200.0),
            size: Vec2::new(128.0, 32.0),
            tint: [1.0; 4],
        };
        add_quad(&mut vertices, &mut indices, &atlas, &sprite);
        assert_eq!(vertices[1].position, [689.0, 184.0]);
        assert_eq!(vertices[1].tex_coords, [entry.uv[2], entry.uv[1]]);
    }

    #[test]
    fn consumed_press_is_ignored_but_release_still_lands() {
        let mut input = InputState::new();
        apply_key_event(&mut input, Key::Space, ElementState::Pressed, true);
        assert!(!input.is_held(Key::Space));
        assert!(!input.is_just_pressed(Key::Space));

        apply_key_event(&mut input, Key::Up, ElementState::Pressed, false);
        assert!(input.is_held(Key::Up));
        apply_key_event(&mut input, Key::Up, ElementState::Released, true);
        assert!(!input.is_held(Key::Up));
    }

    #[test]
    fn only_game_keys_are_mapped() {
        assert_eq!(map_key(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(map_key(KeyCode::Space), Some(Key::Space));
        assert_eq!(map_key(KeyCode::F4), Some(Key::F4));
        assert_eq!(map_key(KeyCode::KeyW), None);
    }
}
