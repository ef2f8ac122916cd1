//! Windows low-level keyboard hook implementation.
//!
//! This module installs a WH_KEYBOARD_LL hook using the Windows API. The
//! hook runs on a dedicated Win32 message-loop thread so that callbacks
//! return quickly regardless of what the async runtime is doing.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::thread;

use speckey_core::{KeyInput, NamedKey, Phase};
use tokio::sync::mpsc::{self, Sender};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    VIRTUAL_KEY, VK_BACK, VK_CONTROL, VK_DOWN, VK_ESCAPE, VK_LCONTROL, VK_LEFT, VK_LMENU,
    VK_LSHIFT, VK_MENU, VK_OEM_1, VK_OEM_2, VK_OEM_7, VK_OEM_COMMA, VK_OEM_MINUS, VK_OEM_PERIOD,
    VK_OEM_PLUS, VK_RCONTROL, VK_RETURN, VK_RIGHT, VK_RMENU, VK_RSHIFT, VK_SHIFT, VK_SPACE,
    VK_TAB, VK_UP,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    UnhookWindowsHookEx, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT, MSG, WH_KEYBOARD_LL, WM_KEYDOWN,
    WM_KEYUP, WM_QUIT, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

use super::{CaptureError, KeySource, RawKeyEvent};

/// Capacity of the captured-event channel.
const CHANNEL_CAPACITY: usize = 256;

/// Global sender used by the hook callback to deliver events to the async
/// runtime. `None` until `start()` is called; reset to `None` by `stop()`
/// so the channel closes and the consumer can finish draining.
static EVENT_SENDER: Mutex<Option<Sender<RawKeyEvent>>> = Mutex::new(None);

/// Thread id of the Win32 message loop, used by `stop()` to post WM_QUIT.
/// Zero until the hook thread has started.
static HOOK_THREAD_ID: AtomicU32 = AtomicU32::new(0);

/// Windows low-level keyboard capture service.
///
/// Installs a `WH_KEYBOARD_LL` hook and runs a dedicated Win32 message
/// loop thread. Only one instance may be started per process.
pub struct WindowsKeyCaptureService;

impl WindowsKeyCaptureService {
    /// Creates a new (unstarted) service instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsKeyCaptureService {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for WindowsKeyCaptureService {
    fn start(&self) -> Result<mpsc::Receiver<RawKeyEvent>, CaptureError> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        {
            let mut guard = EVENT_SENDER.lock().map_err(|_| {
                CaptureError::HookInstallFailed("event sender lock poisoned".to_string())
            })?;
            if guard.is_some() {
                return Err(CaptureError::AlreadyStarted);
            }
            *guard = Some(tx);
        }

        // Spawn the Win32 message loop thread that installs and manages the hook.
        thread::Builder::new()
            .name("speckey-hook-loop".to_string())
            .spawn(run_hook_message_loop)
            .map_err(|e| CaptureError::HookInstallFailed(e.to_string()))?;

        Ok(rx)
    }

    fn stop(&self) {
        // Dropping the sender closes the channel, which ends the consumer's
        // receive loop once buffered events are drained.
        if let Ok(mut guard) = EVENT_SENDER.lock() {
            *guard = None;
        }

        let thread_id = HOOK_THREAD_ID.load(Ordering::SeqCst);
        if thread_id != 0 {
            // SAFETY: WM_QUIT unblocks GetMessageW on the hook thread so it
            // can remove the hook and exit.
            unsafe {
                let _ = PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
            }
        }
    }
}

/// Entry point for the dedicated Win32 message loop thread.
fn run_hook_message_loop() {
    // SAFETY: GetCurrentThreadId has no preconditions; the id is published
    // so stop() can post WM_QUIT to this thread.
    HOOK_THREAD_ID.store(unsafe { GetCurrentThreadId() }, Ordering::SeqCst);

    // SAFETY: SetWindowsHookExW requires the calling thread to have a message
    // loop. We install the hook before entering the loop.
    let kbd_hook: HHOOK = unsafe {
        SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), None, 0)
            .expect("WH_KEYBOARD_LL hook installation failed")
    };

    // Win32 message loop – blocks until WM_QUIT is posted
    let mut msg = MSG::default();
    // SAFETY: Standard Win32 GetMessage/DispatchMessage loop pattern.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            DispatchMessageW(&msg);
        }
        UnhookWindowsHookEx(kbd_hook).ok();
    }
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// This function is called by Windows from the hook message loop thread.
/// It must return quickly (< ~300ms) to avoid hook removal by the OS.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
    let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);

    let phase = match w_param.0 as u32 {
        WM_KEYDOWN | WM_SYSKEYDOWN => Phase::Down,
        WM_KEYUP | WM_SYSKEYUP => Phase::Up,
        _ => {
            return CallNextHookEx(None, n_code, w_param, l_param);
        }
    };

    let key = match vk_to_key_input(kbs.vkCode as u16) {
        Some(key) => key,
        None => {
            // Keys with no bridge meaning (function keys, media keys, ...)
            // pass through untouched.
            return CallNextHookEx(None, n_code, w_param, l_param);
        }
    };

    if let Ok(guard) = EVENT_SENDER.lock() {
        if let Some(sender) = guard.as_ref() {
            // try_send keeps the callback non-blocking; if the channel is
            // full the event is dropped rather than stalling the hook.
            let _ = sender.try_send(RawKeyEvent::now(key, phase));
        }
    }

    // SAFETY: Forward the event to the next hook in the chain so the local
    // system still sees it.
    CallNextHookEx(None, n_code, w_param, l_param)
}

/// Translates a Windows virtual-key code into a [`KeyInput`].
///
/// Digits and letters carry their ASCII identity in the virtual-key code
/// itself. OEM punctuation keys are mapped for a US layout; they surface
/// as characters so the resolver can report them when they have no
/// mapping. Returns `None` for keys the bridge has no use for.
fn vk_to_key_input(vk: u16) -> Option<KeyInput> {
    match vk {
        // '0'..'9' on the main row
        0x30..=0x39 => return Some(KeyInput::Char(vk as u8 as char)),
        // 'A'..'Z'; reported lowercase, the resolver handles aliasing
        0x41..=0x5A => return Some(KeyInput::Char((vk as u8).to_ascii_lowercase() as char)),
        // Numpad digits
        0x60..=0x69 => return Some(KeyInput::Char((b'0' + (vk - 0x60) as u8) as char)),
        _ => {}
    }

    let named = match VIRTUAL_KEY(vk) {
        VK_RETURN => NamedKey::Enter,
        VK_SPACE => NamedKey::Space,
        VK_SHIFT | VK_LSHIFT => NamedKey::LeftShift,
        VK_RSHIFT => NamedKey::RightShift,
        VK_UP => NamedKey::ArrowUp,
        VK_DOWN => NamedKey::ArrowDown,
        VK_LEFT => NamedKey::ArrowLeft,
        VK_RIGHT => NamedKey::ArrowRight,
        VK_ESCAPE => NamedKey::Escape,
        VK_TAB => NamedKey::Tab,
        VK_BACK => NamedKey::Backspace,
        VK_CONTROL | VK_LCONTROL | VK_RCONTROL => NamedKey::Control,
        VK_MENU | VK_LMENU | VK_RMENU => NamedKey::Alt,
        VK_OEM_MINUS => return Some(KeyInput::Char('-')),
        VK_OEM_PLUS => return Some(KeyInput::Char('=')),
        VK_OEM_COMMA => return Some(KeyInput::Char(',')),
        VK_OEM_PERIOD => return Some(KeyInput::Char('.')),
        VK_OEM_1 => return Some(KeyInput::Char(';')),
        VK_OEM_2 => return Some(KeyInput::Char('/')),
        VK_OEM_7 => return Some(KeyInput::Char('\'')),
        _ => return None,
    };

    Some(KeyInput::Named(named))
}
