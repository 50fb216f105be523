/// Frame schedule for the transformation animation
use nalgebra::Matrix3;
use std::path::PathBuf;

use crate::affine::{compose, FrameParams};

/// Settings for the transformation GIF.
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    /// Number of frames in one loop.
    pub frames: usize,
    /// Playback rate of the encoded GIF.
    pub fps: u32,
    /// Print the combined matrix every `print_every` frames; 0 disables it.
    pub print_every: usize,
    pub output: PathBuf,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames: 60,
            fps: 20,
            print_every: 20,
            output: PathBuf::from("transformations.gif"),
        }
    }
}

impl AnimationConfig {
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        (0..self.frames).map(move |index| Frame::new(index, self.frames))
    }

    pub fn should_print(&self, index: usize) -> bool {
        self.print_every != 0 && index % self.print_every == 0
    }
}

/// One time sample of the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub index: usize,
    pub total: usize,
}

impl Frame {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    /// `index / total`, in `[0, 1)`.
    pub fn t(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.index as f64 / self.total as f64
    }

    pub fn params(&self) -> FrameParams {
        FrameParams::at(self.t())
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        compose(self.t())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnimationConfig::default();
        assert_eq!(config.frames, 60);
        assert_eq!(config.fps, 20);
        assert_eq!(config.frames().count(), 60);
    }

    #[test]
    fn test_frames_cover_half_open_interval() {
        let config = AnimationConfig {
            frames: 4,
            ..Default::default()
        };
        let ts: Vec<f64> = config.frames().map(|f| f.t()).collect();
        assert_eq!(ts, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_should_print() {
        let config = AnimationConfig::default();
        let printed: Vec<usize> = (0..60).filter(|&i| config.should_print(i)).collect();
        assert_eq!(printed, vec![0, 20, 40]);

        let silent = AnimationConfig {
            print_every: 0,
            ..Default::default()
        };
        assert!(!silent.should_print(0));
    }

    #[test]
    fn test_frame_matrix_matches_compose() {
        let frame = Frame::new(15, 60);
        assert!((frame.matrix() - compose(0.25)).norm() < 1e-12);
        assert!((frame.params().tx - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_frames_are_independent() {
        let config = AnimationConfig::default();
        let forward: Vec<_> = config.frames().map(|f| f.matrix()).collect();
        let backward: Vec<_> = config
            .frames()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|f| f.matrix())
            .collect();
        for (a, b) in forward.iter().zip(backward.iter().rev()) {
            assert_eq!(a, b);
        }
    }
}
