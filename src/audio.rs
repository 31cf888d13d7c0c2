//! Background music control
//!
//! The game only starts, pauses and rewinds one looping track. Failures are
//! reported to the caller and never stop play.

use crate::error::AudioError;

/// Music transport the state machine drives
pub trait AudioControl {
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    /// Seek back to the start of the track
    fn rewind(&mut self);
}

/// No output; used headless and when the platform has no audio
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioControl for SilentAudio {
    fn play(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn rewind(&mut self) {}
}

/// Music through an `<audio>` element on the page
#[cfg(target_arch = "wasm32")]
pub struct HtmlMusic {
    element: Option<web_sys::HtmlAudioElement>,
}

#[cfg(target_arch = "wasm32")]
impl HtmlMusic {
    /// Attach to the `<audio>` element with the given id
    pub fn from_element_id(id: &str, volume: f32) -> Self {
        use wasm_bindgen::JsCast;

        let element = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<web_sys::HtmlAudioElement>().ok());
        match &element {
            Some(el) => {
                el.set_loop(true);
                el.set_volume(f64::from(volume.clamp(0.0, 1.0)));
            }
            None => log::warn!("No <audio id=\"{}\"> element - music disabled", id),
        }
        Self { element }
    }
}

#[cfg(target_arch = "wasm32")]
impl AudioControl for HtmlMusic {
    fn play(&mut self) -> Result<(), AudioError> {
        let Some(el) = &self.element else {
            return Err(AudioError::Unavailable);
        };
        let promise = el
            .play()
            .map_err(|e| AudioError::Blocked(format!("{:?}", e)))?;

        // Autoplay rejection arrives asynchronously
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log::warn!("{}", AudioError::Blocked(format!("{:?}", e)));
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(el) = &self.element {
            let _ = el.pause();
        }
    }

    fn rewind(&mut self) {
        if let Some(el) = &self.element {
            el.set_current_time(0.0);
        }
    }
}
