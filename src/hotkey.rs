//! Global capture hotkey (Ctrl+Alt+S).
//!
//! On Windows the hotkey is registered with `RegisterHotKey` on a dedicated
//! thread whose message loop forwards every press to the capture worker.
//! Elsewhere only the in-window shortcut is available.

use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use crate::pipeline::TriggerSource;

#[cfg(windows)]
pub fn spawn_global_hotkey(triggers: Sender<TriggerSource>) -> Option<JoinHandle<()>> {
    use tracing::{error, info};
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, MOD_ALT, MOD_CONTROL, MOD_NOREPEAT,
    };
    use windows::Win32::UI::WindowsAndMessaging::{GetMessageW, MSG, WM_HOTKEY};

    const HOTKEY_CAPTURE: i32 = 1;

    let handle = std::thread::spawn(move || {
        // Thread-level hotkey: WM_HOTKEY is posted to this thread's queue
        if let Err(e) = unsafe {
            RegisterHotKey(
                HWND::default(),
                HOTKEY_CAPTURE,
                MOD_CONTROL | MOD_ALT | MOD_NOREPEAT,
                0x53, // 'S' key
            )
        } {
            error!("Failed to register Ctrl+Alt+S: {}", e);
            return;
        }
        info!("Hotkey: Ctrl+Alt+S (screenshot)");

        let mut msg = MSG::default();
        unsafe {
            while GetMessageW(&mut msg, HWND::default(), 0, 0).as_bool() {
                if msg.message == WM_HOTKEY && msg.wParam.0 as i32 == HOTKEY_CAPTURE {
                    if triggers.send(TriggerSource::Hotkey).is_err() {
                        break;
                    }
                }
            }
            let _ = UnregisterHotKey(HWND::default(), HOTKEY_CAPTURE);
        }
    });

    Some(handle)
}

#[cfg(not(windows))]
pub fn spawn_global_hotkey(triggers: Sender<TriggerSource>) -> Option<JoinHandle<()>> {
    drop(triggers);
    tracing::info!("Global hotkey unavailable on this platform; use Ctrl+Alt+S in the overlay");
    None
}
