// Browser file picker. On wasm a single hidden <input type=file> is created on first use and
// reused for every later click; the first chosen file is read and parked until the next frame
// collects it. Native builds use rfd (see `acquire`).

#[cfg(any(target_arch = "wasm32", test))]
use std::cell::RefCell;

#[cfg(any(target_arch = "wasm32", test))]
use crate::acquire::ACCEPTED_EXTENSIONS;

/// Value of the input's `accept` attribute, e.g. `.png,.jpg`.
#[cfg(any(target_arch = "wasm32", test))]
fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Returns the value held in `slot`, creating it with `create` only when the slot is empty.
/// A failed `create` leaves the slot empty so the next call tries again.
#[cfg(any(target_arch = "wasm32", test))]
fn reuse_or_create<T: Clone>(slot: &RefCell<Option<T>>, create: impl FnOnce() -> Option<T>) -> Option<T> {
    if let Some(existing) = slot.borrow().as_ref() {
        return Some(existing.clone());
    }
    let created = create()?;
    *slot.borrow_mut() = Some(created.clone());
    Some(created)
}

#[cfg(target_arch = "wasm32")]
mod web {
    use js_sys::Uint8Array;
    use once_cell::sync::Lazy;
    use std::cell::RefCell;
    use std::sync::Mutex;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen::closure::Closure;
    use web_sys::{Document, FileReader, HtmlInputElement};

    use super::{accept_attribute, reuse_or_create};
    use crate::acquire::{AcquiredFile, FileSource, is_accepted};

    static PICKED_FILE: Lazy<Mutex<Option<AcquiredFile>>> = Lazy::new(|| Mutex::new(None));

    thread_local! {
        static PICKER_INPUT: RefCell<Option<HtmlInputElement>> = const { RefCell::new(None) };
    }

    fn store(file: AcquiredFile) {
        match PICKED_FILE.lock() {
            Ok(mut slot) => *slot = Some(file),
            Err(e) => log::error!("file_picker: slot poisoned: {e}"),
        }
    }

    fn read_first_file(input: &HtmlInputElement, ctx: &egui::Context) {
        // Only the first chosen file is used.
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        let name = file.name();
        if !is_accepted(&name, &file.type_()) {
            log::debug!("file_picker: ignoring {name}");
            return;
        }
        let reader = match FileReader::new() {
            Ok(reader) => reader,
            Err(e) => {
                log::warn!("file_picker: no FileReader for {name}: {e:?}");
                return;
            }
        };
        let reader_done = reader.clone();
        let ctx = ctx.clone();
        let file_name = name.clone();
        // Dropped by wasm-bindgen once it has run.
        let onload = Closure::once_into_js(move |_e: JsValue| {
            let Ok(result) = reader_done.result() else {
                log::warn!("file_picker: could not read {file_name}");
                return;
            };
            let bytes = Uint8Array::new(&result).to_vec();
            store(AcquiredFile::new(file_name, bytes, FileSource::Picked));
            ctx.request_repaint();
        });
        reader.set_onload(Some(onload.unchecked_ref()));
        if let Err(e) = reader.read_as_array_buffer(&file) {
            reader.set_onload(None);
            log::warn!("file_picker: failed to start reading {name}: {e:?}");
        }
    }

    fn create_input(document: &Document, ctx: &egui::Context) -> Option<HtmlInputElement> {
        let input = document
            .create_element("input")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())?;

        input.set_type("file");
        input.set_accept(&accept_attribute());
        // Off-screen rather than display:none; some browsers block clicks on hidden inputs.
        if let Err(e) = input.set_attribute(
            "style",
            "position: fixed; left: -9999px; width: 1px; height: 1px; opacity: 0;",
        ) {
            log::warn!("file_picker: could not hide input: {e:?}");
        }

        let body = document.body()?;
        if let Err(e) = body.append_child(&input) {
            log::warn!("file_picker: could not attach input: {e:?}");
            return None;
        }

        let ctx = ctx.clone();
        let onchange = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
            if let Some(input) = ev.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
                read_first_file(&input, &ctx);
            }
        });
        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        // One handler for the lifetime of the page, owned by the input from here on.
        onchange.forget();

        Some(input)
    }

    pub fn open_image_picker(ctx: &egui::Context) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let input = PICKER_INPUT.with(|slot| reuse_or_create(slot, || create_input(&document, ctx)));
        let Some(input) = input else {
            return;
        };
        // Clearing lets the same file fire `change` again.
        input.set_value("");
        input.click();
    }

    pub fn take_picked_file() -> Option<AcquiredFile> {
        PICKED_FILE.lock().ok()?.take()
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{open_image_picker, take_picked_file};

#[cfg(not(target_arch = "wasm32"))]
pub fn take_picked_file() -> Option<crate::acquire::AcquiredFile> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn picker_input_is_created_once() {
        let slot = RefCell::new(None);
        let created = Cell::new(0);
        let make = || {
            created.set(created.get() + 1);
            Some(created.get())
        };

        assert_eq!(reuse_or_create(&slot, make), Some(1));
        assert_eq!(reuse_or_create(&slot, make), Some(1));
        assert_eq!(reuse_or_create(&slot, make), Some(1));
        assert_eq!(created.get(), 1);
    }

    #[test]
    fn failed_creation_is_retried() {
        let slot: RefCell<Option<u8>> = RefCell::new(None);
        assert_eq!(reuse_or_create(&slot, || None), None);
        assert!(slot.borrow().is_none());
        assert_eq!(reuse_or_create(&slot, || Some(7)), Some(7));
        assert_eq!(reuse_or_create(&slot, || Some(8)), Some(7));
    }

    #[test]
    fn accept_attribute_lists_every_extension() {
        assert_eq!(accept_attribute(), ".png,.jpg,.jpeg,.gif,.webp");
    }
}
