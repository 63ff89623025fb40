use std::time::Duration;

use crate::params::ParameterSet;
use crate::render::Camera;
use crate::style::{ColorProperty, StyleSource, WIREFRAME_COLOR_PROPERTY};

/// Output surface the driver renders into.
pub trait FrameTarget {
    fn resize(&mut self, width: u32, height: u32);
    fn render(&mut self, params: &ParameterSet, camera: &Camera);
    /// Ask the host for the next display-synchronized tick.
    fn request_frame(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

/// Owns the per-frame parameters and is the only code that writes them.
pub struct AnimationDriver<S: StyleSource> {
    state: DriverState,
    params: ParameterSet,
    camera: Camera,
    style: S,
    color: ColorProperty,
}

impl<S: StyleSource> AnimationDriver<S> {
    pub fn new(params: ParameterSet, camera: Camera, style: S) -> Self {
        Self {
            state: DriverState::Idle,
            params,
            camera,
            style,
            color: ColorProperty::default(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn style(&self) -> &S {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut S {
        &mut self.style
    }

    /// Leave `Idle` and request the first tick.
    pub fn start(&mut self, target: &impl FrameTarget) {
        if self.state == DriverState::Idle {
            self.state = DriverState::Running;
            target.request_frame();
        }
    }

    /// One scheduled frame: update time and color, render, schedule the next.
    pub fn tick(&mut self, elapsed: Duration, target: &mut impl FrameTarget) {
        self.state = DriverState::Running;
        self.params.time = elapsed.as_secs_f32();
        self.params.color = self
            .color
            .resolve(&self.style, WIREFRAME_COLOR_PROPERTY, self.params.color);
        target.render(&self.params, &self.camera);
        target.request_frame();
    }

    /// Host resize: update the projection and surface, then render once right
    /// away instead of waiting for the next tick.
    pub fn resize(&mut self, width: u32, height: u32, target: &mut impl FrameTarget) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_aspect(width as f32, height as f32);
        target.resize(width, height);
        target.render(&self.params, &self.camera);
    }
}
