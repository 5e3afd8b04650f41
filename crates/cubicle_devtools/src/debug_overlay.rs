//! egui layer drawn on top of the office scene.
//!
//! Two things live here: the help-text HUD, which is always shown, and the
//! debug panel toggled by F3. egui needs a three-phase render split because
//! `egui_wgpu::Renderer::render()` wants a `RenderPass<'static>` while
//! `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers
//!   3. `paint()`   -- render into a render pass made with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use cubicle_core::time::TimeState;
use winit::window::Window;

/// Top-left corner of the help text, in logical pixels.
pub const HELP_TEXT_POSITION: (f32, f32) = (10.0, 10.0);
const HELP_TEXT_SIZE: f32 = 16.0;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub draw_calls: u32,
    pub sprite_count: u32,
    /// Estimated GPU memory usage in megabytes
    pub memory_estimate_mb: f32,
    pub texture_count: usize,
    pub player_position: (f32, f32),
    pub player_velocity: (f32, f32),
    pub facing: String,
    pub posture: String,
    /// Sides the player pushed against on the last step, e.g. "left down"
    pub contacts: String,
    pub doors_open: usize,
    pub door_count: usize,
    pub chair_count: usize,
    pub collision_debug: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayActions {
    pub toggle_collision_debug: bool,
    pub respawn_player: bool,
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        help_text: &str,
        stats: Option<OverlayStats>,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        OverlayActions,
    ) {
        let mut actions = OverlayActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Area::new(egui::Id::new("help_text"))
                .fixed_pos(egui::pos2(HELP_TEXT_POSITION.0, HELP_TEXT_POSITION.1))
                .interactable(false)
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(help_text)
                            .size(HELP_TEXT_SIZE)
                            .color(egui::Color32::BLACK),
                    );
                });

            if !self.visible {
                return;
            }
            egui::Window::new("Debug")
                .default_pos([10.0, 40.0])
                .show(ctx, |ui| {
                    ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                    ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                    ui.label(format!("Steps this frame: {}", time.steps_this_frame));
                    ui.label(format!("Total steps: {}", time.fixed_step_count));
                    let Some(ref stats) = stats else {
                        return;
                    };

                    ui.separator();
                    ui.label(format!("Draw calls: {}", stats.draw_calls));
                    ui.label(format!("Sprites: {}", stats.sprite_count));
                    ui.label(format!("Memory: {:.1} MB", stats.memory_estimate_mb));
                    ui.label(format!("Baked textures: {}", stats.texture_count));

                    ui.separator();
                    ui.label(format!(
                        "Player: ({:.1}, {:.1})",
                        stats.player_position.0, stats.player_position.1
                    ));
                    ui.label(format!(
                        "Velocity: ({:.1}, {:.1})",
                        stats.player_velocity.0, stats.player_velocity.1
                    ));
                    ui.label(format!("Facing: {}", stats.facing));
                    ui.label(format!("Posture: {}", stats.posture));
                    if !stats.contacts.is_empty() {
                        ui.label(format!("Blocked: {}", stats.contacts));
                    }
                    ui.label(format!(
                        "Doors open: {}/{}  Chairs: {}",
                        stats.doors_open, stats.door_count, stats.chair_count
                    ));

                    ui.separator();
                    ui.horizontal(|ui| {
                        let label = if stats.collision_debug {
                            "Hide colliders"
                        } else {
                            "Show colliders"
                        };
                        if ui.button(label).clicked() {
                            actions.toggle_collision_debug = true;
                        }
                        if ui.button("Respawn").clicked() {
                            actions.respawn_player = true;
                        }
                    });
                });
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
