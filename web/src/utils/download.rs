use shared_types::export::pools_to_csv;
use shared_types::Pool;

/// Writes the pool table as CSV and hands it to the browser as a download.
pub fn download_pools_csv(pools: &[Pool]) -> Result<(), String> {
    let csv = pools_to_csv(pools).map_err(|err| err.to_string())?;
    download_text(&csv_filename(), "text/csv;charset=utf-8", &csv)
}

fn csv_filename() -> String {
    #[cfg(feature = "hydrate")]
    {
        format!("piscinas_{}.csv", chrono::Utc::now().format("%Y-%m-%d"))
    }

    #[cfg(not(feature = "hydrate"))]
    {
        "piscinas.csv".to_string()
    }
}

pub fn download_text(filename: &str, mime: &str, contents: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen::{JsCast, JsValue};

        let js_error = |err: JsValue| format!("{err:?}");

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| "No document available".to_string())?;

        let parts = js_sys::Array::of1(&JsValue::from_str(contents));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime);
        let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
            .map_err(js_error)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_error)?;

        let anchor: web_sys::HtmlAnchorElement = document
            .create_element("a")
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| "Could not create a download link".to_string())?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.click();

        web_sys::Url::revoke_object_url(&url).map_err(js_error)?;
        Ok(())
    }

    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (filename, mime, contents);
        Err("Downloads are only available in the browser".to_string())
    }
}
