use asset::request::RequestHandle;
use asset::{AssetRequest, LoadEvent, LoadOutcome, LoadedAsset, LoaderRegistry};
use corelib::animation::AnimationController;
use corelib::camera::Camera;
use corelib::clock::Clock;
use corelib::geometry::{box_mesh, sphere_mesh, torus_mesh};
use corelib::light::Light;
use corelib::material::{Color, Material, Side};
use corelib::model::{Model, ModelPart, PartMesh};
use corelib::render::{RenderError, SceneRenderer};
use corelib::scene::{NodeId, Scene, TextureId};
use corelib::transform::Transform;
use corelib::{Vec3, vec3};

use crate::config::ViewerConfig;
use crate::host::{Container, ViewerHooks};
use crate::interaction::{InteractionState, PointerInput};

pub struct Viewer<R: SceneRenderer> {
    config: ViewerConfig,
    container: Container,
    scene: Scene,
    camera: Camera,
    renderer: R,
    /// Node rotated by drag and auto-rotation.
    model: Option<NodeId>,
    animation: Option<AnimationController>,
    clock: Clock,
    interaction: InteractionState,
    loaded: bool,
    frame_count: u64,
    hooks: ViewerHooks,
}

impl<R: SceneRenderer> Viewer<R> {
    /// Builds the viewer inside `container`.
    ///
    /// Returns `None` when there is no container (silently) or when the
    /// renderer cannot be created (logged). In both cases nothing else is
    /// constructed.
    pub fn init<F>(
        container: Option<Container>,
        config: ViewerConfig,
        hooks: ViewerHooks,
        make_renderer: F,
    ) -> Option<Self>
    where
        F: FnOnce(&Container) -> anyhow::Result<R>,
    {
        let Some(container) = container else {
            log::debug!("No viewer container; 3D viewer disabled");
            return None;
        };
        log::info!(
            "Initializing 3D viewer in {}x{} container (pixel ratio {:.2})",
            container.width,
            container.height,
            container.pixel_ratio
        );

        let mut renderer = match make_renderer(&container) {
            Ok(r) => r,
            Err(e) => {
                log::error!("3D renderer unavailable: {e:#}");
                return None;
            }
        };
        renderer.set_pixel_ratio(container.pixel_ratio);
        renderer.set_size(container.width, container.height);
        renderer.set_shadow_mode(config.shadow_mode);

        let mut camera = Camera::new_perspective(
            config.camera_position,
            Vec3::ZERO,
            Vec3::Y,
            config.fov_y_deg.to_radians(),
            config.z_near,
            config.z_far,
            1.0,
        );
        camera.set_viewport(container.width, container.height);
        camera.update_projection_matrix();

        let mut viewer = Self {
            config,
            container,
            scene: Scene::new(Color::BLACK),
            camera,
            renderer,
            model: None,
            animation: None,
            clock: Clock::new(),
            interaction: InteractionState::default(),
            loaded: false,
            frame_count: 0,
            hooks,
        };
        viewer.add_lights();
        viewer.add_test_cubes();
        viewer.add_placeholder();
        log::info!(
            "3D viewer initialized: {} nodes ({} lights)",
            viewer.scene.len(),
            viewer.scene.light_count()
        );
        Some(viewer)
    }

    fn add_lights(&mut self) {
        self.scene.add_light(
            "ambient",
            Light::ambient(Color::WHITE, 0.4),
            Transform::identity(),
        );
        self.scene.add_light(
            "sun",
            Light::directional(Color::WHITE, 0.8).with_shadow(self.config.directional_shadow),
            Transform::from_translation(vec3(5.0, 5.0, 5.0)),
        );
        self.scene.add_light(
            "fill",
            Light::point(Color::WHITE, 0.5),
            Transform::from_translation(vec3(-5.0, 5.0, 5.0)),
        );
    }

    /// Two flat-shaded cubes that show up even if lighting is broken.
    fn add_test_cubes(&mut self) {
        let cube = self.scene.add_geometry(box_mesh(1.0, 1.0, 1.0));
        self.scene.add_mesh(
            "test-cube-left",
            cube,
            Material::unlit(Color::from_hex(0x00ff00)),
            Transform::from_translation(vec3(-2.0, 0.0, 0.0)),
        );
        self.scene.add_mesh(
            "test-cube-right",
            cube,
            Material::unlit(Color::from_hex(0xff0000)),
            Transform::from_translation(vec3(2.0, 0.0, 0.0)),
        );
    }

    /// Box (the initial primary model), sphere and torus.
    fn add_placeholder(&mut self) {
        let boxed = self.scene.add_geometry(box_mesh(2.0, 2.0, 2.0));
        let sphere = self.scene.add_geometry(sphere_mesh(0.5, 16, 16));
        let torus = self.scene.add_geometry(torus_mesh(0.3, 0.1, 8, 16));

        let primary = self.scene.add_mesh(
            "placeholder-box",
            boxed,
            Material::phong(Color::from_hex(0x00ff00)).with_opacity(0.9),
            Transform::identity(),
        );
        self.scene.add_mesh(
            "placeholder-sphere",
            sphere,
            Material::phong(Color::from_hex(0xff0000)).with_opacity(0.8),
            Transform::from_translation(vec3(1.5, 0.0, 0.0)),
        );
        self.scene.add_mesh(
            "placeholder-torus",
            torus,
            Material::phong(Color::from_hex(0x0000ff)).with_opacity(0.8),
            Transform::from_translation(vec3(-1.5, 0.0, 0.0)),
        );
        self.model = Some(primary);
        log::info!("Placeholder model created");
    }

    /// Issues the asset request. Events must be fed back through
    /// [`Viewer::handle_load_event`] on this thread.
    ///
    /// Returns `None` (placeholder only) when no loader handles the asset
    /// format or the request could not start.
    pub fn start_loading<S>(&self, registry: &LoaderRegistry, sink: S) -> Option<RequestHandle>
    where
        S: Fn(LoadEvent) + Clone + Send + 'static,
    {
        let path = &self.config.asset_path;
        let Some(loader) = registry.for_path(path) else {
            log::error!(
                "No asset loader for {}; using placeholder model only",
                path.display()
            );
            return None;
        };
        log::info!("Loading 3D model {} ({} loader)", path.display(), loader.name());
        match AssetRequest::new(path.clone(), loader, self.config.load_timeout).spawn(sink) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("Could not start loading {}: {e:#}", path.display());
                None
            }
        }
    }

    pub fn handle_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Progress(p) => match p.percent() {
                Some(pct) => log::info!("Loading progress: {pct:.1}%"),
                None => log::info!("Loading progress: {} bytes", p.loaded),
            },
            LoadEvent::TimedOut { after } => {
                log::error!(
                    "3D model loading timed out after {:.1}s; using placeholder model only",
                    after.as_secs_f32()
                );
            }
            LoadEvent::Finished(LoadOutcome::Success(asset)) => self.attach_asset(asset),
            LoadEvent::Finished(LoadOutcome::Failure(e)) => {
                log::error!("Error loading 3D model: {e:#}");
                log::debug!("Full error: {e:?}");
            }
        }
    }

    /// Adds the loaded asset as the new primary model. Placeholder shapes stay.
    fn attach_asset(&mut self, asset: LoadedAsset) {
        let LoadedAsset {
            name,
            meshes,
            nodes,
            clips,
            textures,
        } = asset;

        let texture_ids: Vec<TextureId> = textures
            .into_iter()
            .map(|t| self.scene.add_texture(t))
            .collect();
        let slots: Vec<PartMesh> = meshes
            .into_iter()
            .map(|m| PartMesh {
                geometry: self.scene.add_geometry(m.data),
                material: Material {
                    side: Side::Double,
                    base_color_map: m.base_color_texture.and_then(|i| texture_ids.get(i).copied()),
                    ..m.material
                },
                cast_shadow: true,
                receive_shadow: true,
            })
            .collect();
        let parts = nodes
            .into_iter()
            .map(|n| ModelPart {
                name: n.name,
                parent: n.parent,
                pose: n.pose,
                meshes: n.meshes.iter().filter_map(|&i| slots.get(i).cloned()).collect(),
            })
            .collect();
        let model = Model { name, parts, clips };
        let (mesh_count, clip_count) = (model.mesh_count(), model.clips.len());

        let mut transform = Transform::identity();
        transform.set_uniform_scale(self.config.model_scale);
        let id = match self.scene.add_model(model, transform) {
            Ok(id) => id,
            Err(e) => {
                log::error!("Error loading 3D model: {e}");
                return;
            }
        };
        self.model = Some(id);

        if clip_count > 0 {
            let mut controller = AnimationController::new(id);
            let first = controller.clip_action(0);
            controller.play(first);
            self.animation = Some(controller);
        }

        log::info!(
            "3D model loaded: {} meshes, {} textures, {} animation clips",
            mesh_count,
            texture_ids.len(),
            clip_count
        );
        self.mark_loaded();
        self.interaction.enable();
    }

    fn mark_loaded(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        if let Some(on_loaded) = self.hooks.on_loaded.as_mut() {
            on_loaded();
        }
    }

    pub fn handle_pointer(&mut self, input: PointerInput) {
        let Some((dx, dy)) = self.interaction.handle(input) else {
            return;
        };
        let k = self.config.drag_sensitivity;
        if let Some(t) = self.model.and_then(|id| self.scene.transform_mut(id)) {
            t.rotate(dx * k, dy * k);
        }
    }

    /// One frame, timed by the viewer clock.
    pub fn tick(&mut self) {
        let dt = self.clock.delta();
        self.advance(dt);
    }

    /// One frame with an explicit animation delta in seconds.
    pub fn advance(&mut self, dt: f32) {
        if !self.interaction.is_interacting() {
            if let Some(t) = self.model.and_then(|id| self.scene.transform_mut(id)) {
                t.rotate(self.config.auto_rotate_speed, 0.0);
            }
        }

        let (yaw, pitch) = self.config.spin_speed;
        self.scene.spin_meshes(self.model, yaw, pitch);

        if let Some(controller) = self.animation.as_mut() {
            if let Some(model) = self.scene.model_mut(controller.target()) {
                controller.update(dt, model);
            }
        }

        match self.renderer.render(&self.scene, &self.camera) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => log::debug!("Surface lost; frame skipped"),
            Err(e) => log::error!("Render failed: {e}"),
        }

        self.frame_count += 1;
        if self.config.frame_log_interval > 0
            && self.frame_count % self.config.frame_log_interval == 0
        {
            log::debug!("3D scene is animating, frame: {}", self.frame_count);
        }
    }

    /// New container size: camera aspect and renderer follow, nothing else.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.container.width = width;
        self.container.height = height;
        self.camera.set_viewport(width, height);
        self.camera.update_projection_matrix();
        self.renderer.set_size(width, height);
    }

    pub fn set_pixel_ratio(&mut self, ratio: f32) {
        self.container.pixel_ratio = ratio;
        self.renderer.set_pixel_ratio(ratio);
        self.renderer.set_size(self.container.width, self.container.height);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn primary_model(&self) -> Option<NodeId> {
        self.model
    }

    pub fn animation(&self) -> Option<&AnimationController> {
        self.animation.as_ref()
    }

    pub fn is_interacting(&self) -> bool {
        self.interaction.is_interacting()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use approx::assert_relative_eq;
    use corelib::animation::{AnimationClip, Channel, ChannelValues, Interpolation};
    use asset::Progress;
    use corelib::render::ShadowMode;
    use corelib::scene::NodeKind;
    use corelib::texture::TextureData;

    use super::*;

    #[derive(Default)]
    struct RecordingRenderer {
        frames: usize,
        size: (u32, u32),
        pixel_ratio: f32,
        shadow_mode: ShadowMode,
    }

    impl SceneRenderer for RecordingRenderer {
        fn set_pixel_ratio(&mut self, ratio: f32) {
            self.pixel_ratio = ratio;
        }
        fn set_size(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }
        fn set_shadow_mode(&mut self, mode: ShadowMode) {
            self.shadow_mode = mode;
        }
        fn render(&mut self, _scene: &Scene, _camera: &Camera) -> Result<(), RenderError> {
            self.frames += 1;
            Ok(())
        }
    }

    fn viewer_with_hook() -> (Viewer<RecordingRenderer>, Rc<Cell<u32>>) {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let viewer = Viewer::init(
            Some(Container::new(800, 600, 2.0)),
            ViewerConfig::default(),
            ViewerHooks::on_loaded(move || counter.set(counter.get() + 1)),
            |_| Ok(RecordingRenderer::default()),
        )
        .expect("viewer");
        (viewer, fired)
    }

    fn node_named(viewer: &Viewer<RecordingRenderer>, name: &str) -> NodeId {
        viewer
            .scene()
            .children()
            .find(|(_, n)| n.name == name)
            .map(|(id, _)| id)
            .unwrap()
    }

    fn animated_asset(clip_count: usize) -> LoadedAsset {
        let mut asset = LoadedAsset::single_mesh(box_mesh(100.0, 100.0, 100.0), Material::default());
        asset.name = "hero".into();
        asset.clips = (0..clip_count)
            .map(|i| {
                let ch = Channel::new(
                    0,
                    vec![0.0, 1.0],
                    ChannelValues::Translation(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]),
                    Interpolation::Linear,
                )
                .unwrap();
                AnimationClip::new(format!("clip{i}"), vec![ch])
            })
            .collect();
        asset
    }

    fn succeed(viewer: &mut Viewer<RecordingRenderer>, asset: LoadedAsset) {
        viewer.handle_load_event(LoadEvent::Finished(LoadOutcome::Success(asset)));
    }

    #[test]
    fn missing_renderer_constructs_nothing() {
        let viewer: Option<Viewer<RecordingRenderer>> = Viewer::init(
            Some(Container::new(800, 600, 1.0)),
            ViewerConfig::default(),
            ViewerHooks::default(),
            |_| Err(anyhow::anyhow!("no GPU adapter")),
        );
        assert!(viewer.is_none());
    }

    #[test]
    fn missing_container_disables_silently() {
        let called = Cell::new(false);
        let viewer: Option<Viewer<RecordingRenderer>> = Viewer::init(
            None,
            ViewerConfig::default(),
            ViewerHooks::default(),
            |_| {
                called.set(true);
                Ok(RecordingRenderer::default())
            },
        );
        assert!(viewer.is_none());
        assert!(!called.get());
    }

    #[test]
    fn setup_configures_camera_and_renderer() {
        let (viewer, _) = viewer_with_hook();
        let cam = viewer.camera();
        assert_relative_eq!(cam.fov_y_rad, 75f32.to_radians());
        assert_relative_eq!(cam.z_near, 0.1);
        assert_relative_eq!(cam.z_far, 1000.0);
        assert_relative_eq!(cam.aspect, 800.0 / 600.0);
        assert_eq!(viewer.scene().background, Color::BLACK);

        let r = viewer.renderer();
        assert_eq!(r.size, (800, 600));
        assert_relative_eq!(r.pixel_ratio, 2.0);
        assert_eq!(r.shadow_mode, ShadowMode::PcfSoft);
    }

    #[test]
    fn placeholder_content_is_present_before_loading() {
        let (viewer, fired) = viewer_with_hook();
        let scene = viewer.scene();
        assert_eq!(scene.light_count(), 3);
        // Two test cubes + box, sphere, torus.
        assert_eq!(scene.mesh_count(), 5);
        assert_eq!(scene.len(), 8);

        let shadow_casters: Vec<_> = scene.lights().filter(|l| l.light.casts_shadow()).collect();
        assert_eq!(shadow_casters.len(), 1);
        match shadow_casters[0].light {
            Light::Directional { shadow: Some(cfg), .. } => {
                assert_eq!((cfg.map_width, cfg.map_height), (2048, 2048));
            }
            other => panic!("unexpected shadow caster {other:?}"),
        }

        assert_eq!(viewer.primary_model(), Some(node_named(&viewer, "placeholder-box")));
        assert!(!viewer.is_loaded());
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn success_plays_only_first_clip_and_marks_loaded() {
        let (mut viewer, fired) = viewer_with_hook();
        succeed(&mut viewer, animated_asset(3));

        let id = viewer.primary_model().unwrap();
        let node = viewer.scene().node(id).unwrap();
        assert!(matches!(node.kind, NodeKind::Model(_)));
        assert_eq!(node.transform.scale, Vec3::splat(0.01));
        assert_eq!(node.transform.translation, Vec3::ZERO);

        let model = viewer.scene().model(id).unwrap();
        assert!(model.meshes().all(|m| m.cast_shadow && m.receive_shadow));
        assert!(model.meshes().all(|m| m.material.side == Side::Double));

        let controller = viewer.animation().unwrap();
        assert_eq!(controller.target(), id);
        assert_eq!(controller.playing_clips(), vec![0]);

        assert!(viewer.is_loaded());
        assert_eq!(fired.get(), 1);
        // Placeholder shapes are kept.
        assert_eq!(viewer.scene().mesh_count(), 5);
    }

    #[test]
    fn asset_without_clips_has_no_controller() {
        let (mut viewer, _) = viewer_with_hook();
        succeed(&mut viewer, animated_asset(0));
        assert!(viewer.animation().is_none());
        assert!(viewer.is_loaded());
    }

    #[test]
    fn failure_and_timeout_keep_placeholder() {
        let (mut viewer, fired) = viewer_with_hook();
        let placeholder = viewer.primary_model();
        viewer.handle_load_event(LoadEvent::TimedOut {
            after: std::time::Duration::from_secs(15),
        });
        viewer.handle_load_event(LoadEvent::Finished(LoadOutcome::Failure(anyhow::anyhow!(
            "network unreachable"
        ))));
        assert_eq!(viewer.primary_model(), placeholder);
        assert!(!viewer.is_loaded());
        assert_eq!(fired.get(), 0);
        assert_eq!(viewer.scene().len(), 8);
    }

    #[test]
    fn progress_leaves_viewer_state_alone() {
        let (mut viewer, fired) = viewer_with_hook();
        let placeholder = viewer.primary_model();
        for loaded in [0, 512, 1024] {
            viewer.handle_load_event(LoadEvent::Progress(Progress {
                loaded,
                total: Some(1024),
            }));
        }
        viewer.handle_load_event(LoadEvent::Progress(Progress {
            loaded: 4096,
            total: None,
        }));
        assert_eq!(viewer.primary_model(), placeholder);
        assert!(!viewer.is_loaded());
        assert!(viewer.animation().is_none());
        assert_eq!(fired.get(), 0);
        assert_eq!(viewer.scene().len(), 8);
    }

    #[test]
    fn textured_asset_maps_to_scene_texture() {
        let (mut viewer, _) = viewer_with_hook();
        let mut asset = animated_asset(0);
        asset.textures = vec![
            TextureData::solid([255, 255, 255, 255]),
            TextureData::solid([200, 100, 50, 255]),
        ];
        asset.meshes[0].base_color_texture = Some(1);
        succeed(&mut viewer, asset);

        let id = viewer.primary_model().unwrap();
        let model = viewer.scene().model(id).unwrap();
        let map = model.parts[0].meshes[0].material.base_color_map.expect("texture");
        assert_eq!(
            viewer.scene().texture(map).unwrap().pixel(0, 0),
            Some([200, 100, 50, 255])
        );
    }

    #[test]
    fn out_of_range_texture_index_draws_untextured() {
        let (mut viewer, _) = viewer_with_hook();
        let mut asset = animated_asset(0);
        asset.meshes[0].base_color_texture = Some(4);
        succeed(&mut viewer, asset);

        let model = viewer.scene().model(viewer.primary_model().unwrap()).unwrap();
        assert_eq!(model.parts[0].meshes[0].material.base_color_map, None);
        assert!(viewer.is_loaded());
    }

    #[test]
    fn late_success_after_timeout_still_applies() {
        let (mut viewer, fired) = viewer_with_hook();
        viewer.handle_load_event(LoadEvent::TimedOut {
            after: std::time::Duration::from_secs(15),
        });
        succeed(&mut viewer, animated_asset(1));
        assert!(viewer.is_loaded());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn drag_rotates_by_pointer_delta() {
        let (mut viewer, _) = viewer_with_hook();
        succeed(&mut viewer, animated_asset(0));
        let id = viewer.primary_model().unwrap();

        viewer.handle_pointer(PointerInput::Press { x: 100.0, y: 100.0 });
        assert!(viewer.is_interacting());
        viewer.handle_pointer(PointerInput::Move { x: 130.0, y: 115.0 });
        let t = *viewer.scene().transform(id).unwrap();
        assert_relative_eq!(t.yaw(), 0.30, epsilon = 1e-6);
        assert_relative_eq!(t.pitch(), 0.15, epsilon = 1e-6);

        viewer.handle_pointer(PointerInput::Release);
        assert!(!viewer.is_interacting());
        viewer.handle_pointer(PointerInput::Move { x: 400.0, y: 400.0 });
        let after = *viewer.scene().transform(id).unwrap();
        assert_eq!(after, t);
    }

    #[test]
    fn drag_is_ignored_before_asset_loads() {
        let (mut viewer, _) = viewer_with_hook();
        let id = viewer.primary_model().unwrap();
        viewer.handle_pointer(PointerInput::Press { x: 0.0, y: 0.0 });
        viewer.handle_pointer(PointerInput::Move { x: 50.0, y: 50.0 });
        assert!(!viewer.is_interacting());
        assert_eq!(viewer.scene().transform(id).unwrap().yaw(), 0.0);
    }

    #[test]
    fn ticks_spin_placeholder_and_auto_rotate_primary() {
        let (mut viewer, _) = viewer_with_hook();
        let boxed = node_named(&viewer, "placeholder-box");
        let sphere = node_named(&viewer, "placeholder-sphere");

        for _ in 0..100 {
            viewer.advance(0.0);
        }
        let s = viewer.scene().transform(sphere).unwrap();
        assert_relative_eq!(s.yaw(), 1.0, epsilon = 1e-4);
        assert_relative_eq!(s.pitch(), 0.5, epsilon = 1e-4);
        let b = viewer.scene().transform(boxed).unwrap();
        assert_relative_eq!(b.yaw(), 0.5, epsilon = 1e-4);
        assert_relative_eq!(b.pitch(), 0.0);
        assert_eq!(viewer.renderer().frames, 100);
        assert_eq!(viewer.frame_count(), 100);

        succeed(&mut viewer, animated_asset(0));
        let hero = viewer.primary_model().unwrap();
        for _ in 0..10 {
            viewer.advance(0.0);
        }
        let h = viewer.scene().transform(hero).unwrap();
        assert_relative_eq!(h.yaw(), 0.05, epsilon = 1e-5);
        assert_relative_eq!(h.pitch(), 0.0);
        // The old primary now spins like the other placeholder shapes.
        let b = viewer.scene().transform(boxed).unwrap();
        assert_relative_eq!(b.yaw(), 0.6, epsilon = 1e-4);
        assert_relative_eq!(b.pitch(), 0.05, epsilon = 1e-4);
    }

    #[test]
    fn no_auto_rotate_while_interacting() {
        let (mut viewer, _) = viewer_with_hook();
        succeed(&mut viewer, animated_asset(0));
        let hero = viewer.primary_model().unwrap();
        viewer.handle_pointer(PointerInput::Press { x: 0.0, y: 0.0 });
        viewer.advance(0.0);
        assert_eq!(viewer.scene().transform(hero).unwrap().yaw(), 0.0);
        viewer.handle_pointer(PointerInput::Release);
        viewer.advance(0.0);
        assert_relative_eq!(viewer.scene().transform(hero).unwrap().yaw(), 0.005);
    }

    #[test]
    fn animation_advances_with_frame_delta() {
        let (mut viewer, _) = viewer_with_hook();
        succeed(&mut viewer, animated_asset(2));
        let hero = viewer.primary_model().unwrap();
        viewer.advance(0.25);
        let model = viewer.scene().model(hero).unwrap();
        assert_relative_eq!(model.parts[0].pose.translation.x, 2.5);
    }

    #[test]
    fn resize_updates_aspect_and_surface_only() {
        let (mut viewer, _) = viewer_with_hook();
        let before = *viewer.camera();
        viewer.resize(1600, 800);
        let cam = viewer.camera();
        assert_relative_eq!(cam.aspect, 2.0);
        assert_ne!(cam.proj(), before.proj());
        assert_eq!(cam.eye, before.eye);
        assert_eq!(cam.fov_y_rad, before.fov_y_rad);
        assert_eq!(viewer.renderer().size, (1600, 800));
        assert_eq!(viewer.container().width, 1600);
    }

    #[test]
    fn no_loader_means_no_request() {
        let (viewer, _) = viewer_with_hook();
        let handle = viewer.start_loading(&LoaderRegistry::new(), |_event: LoadEvent| {});
        assert!(handle.is_none());
    }
}
