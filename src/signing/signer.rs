//! Document signer
//!
//! Pure bytes-in/bytes-out PDF mutation: decode the signature raster, embed
//! it as an image XObject on the target page, and serialize the whole
//! document to a fresh byte stream. No file I/O happens at this layer; the
//! caller owns persistence so signing stays independently testable.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::error::SignError;
use super::geometry::{PageSize, PdfRect};

// ============================================================================
// Signature Payload
// ============================================================================

/// Decode a `data:<mime>;base64,<data>` signature payload into raw bytes
///
/// The `data:` scheme prefix is optional; the base64 marker is not. Payloads
/// whose decoded size would exceed `max_bytes` are rejected before decoding.
pub fn decode_signature_payload(payload: &str, max_bytes: usize) -> Result<Vec<u8>, SignError> {
    let trimmed = payload.strip_prefix("data:").unwrap_or(payload);

    let (header, data) = trimmed
        .split_once(',')
        .ok_or_else(|| SignError::SignatureDecode("missing ',' separator".to_string()))?;

    if !header.ends_with(";base64") {
        return Err(SignError::SignatureDecode(
            "payload is not marked base64".to_string(),
        ));
    }

    // Base64 expands 3 bytes to 4 characters; bound before decoding.
    let estimated = data.len() / 4 * 3;
    if estimated > max_bytes {
        return Err(SignError::PayloadTooLarge {
            size: estimated,
            max: max_bytes,
        });
    }

    BASE64
        .decode(data.trim().as_bytes())
        .map_err(|e| SignError::SignatureDecode(e.to_string()))
}

// ============================================================================
// Signature Image
// ============================================================================

/// A decoded signature raster, split into RGB samples and an alpha channel
///
/// The split matches how the image is embedded: a DeviceRGB image XObject
/// carrying the color samples plus a DeviceGray SMask carrying the alpha, so
/// the transparent background of a drawn signature stays transparent on the
/// page.
pub struct SignatureImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Vec<u8>,
}

impl SignatureImage {
    /// Decode PNG or JPEG bytes into an embeddable raster
    pub fn decode(bytes: &[u8]) -> Result<Self, SignError> {
        let format =
            image::guess_format(bytes).map_err(|e| SignError::SignatureDecode(e.to_string()))?;

        if !matches!(format, image::ImageFormat::Png | image::ImageFormat::Jpeg) {
            return Err(SignError::UnsupportedImageFormat(
                format.to_mime_type().to_string(),
            ));
        }

        let rgba = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| SignError::SignatureDecode(e.to_string()))?
            .to_rgba8();

        let (width, height) = rgba.dimensions();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in rgba.pixels() {
            rgb.push(pixel[0]);
            rgb.push(pixel[1]);
            rgb.push(pixel[2]);
            alpha.push(pixel[3]);
        }

        Ok(Self {
            width,
            height,
            rgb,
            alpha,
        })
    }

    /// Pixel dimensions of the decoded raster
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

// ============================================================================
// PDF Signer
// ============================================================================

/// A loaded PDF document being signed
pub struct PdfSigner {
    doc: Document,
}

impl PdfSigner {
    /// Parse a PDF from bytes
    pub fn load(bytes: &[u8]) -> Result<Self, SignError> {
        let doc = Document::load_mem(bytes).map_err(|e| SignError::DocumentLoad(e.to_string()))?;
        Ok(Self { doc })
    }

    /// Number of pages in the document
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn page_id(&self, page: u32) -> Result<ObjectId, SignError> {
        let pages = self.doc.get_pages();
        let count = pages.len() as u32;
        pages
            .get(&page)
            .copied()
            .ok_or(SignError::PageNotFound { page, pages: count })
    }

    /// Media-box dimensions of a page (1-based), walking the parent chain
    pub fn page_size(&self, page: u32) -> Result<PageSize, SignError> {
        let page_id = self.page_id(page)?;

        let mut current = Some(page_id);
        while let Some(id) = current {
            let dict = self
                .doc
                .get_object(id)
                .and_then(|o| o.as_dict())
                .map_err(|e| SignError::DocumentLoad(format!("page has no dictionary: {e}")))?;
            if let Some(size) = self.media_box(dict) {
                return Ok(size);
            }
            current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
        }

        // Some generators omit the MediaBox entirely; assume A4.
        Ok(PageSize::A4)
    }

    fn media_box(&self, dict: &lopdf::Dictionary) -> Option<PageSize> {
        let raw = dict.get(b"MediaBox").ok()?;
        let resolved = match raw {
            Object::Reference(id) => self.doc.get_object(*id).ok()?,
            other => other,
        };
        let arr = resolved.as_array().ok()?;
        if arr.len() != 4 {
            return None;
        }
        let llx = object_to_f64(&arr[0])?;
        let lly = object_to_f64(&arr[1])?;
        let urx = object_to_f64(&arr[2])?;
        let ury = object_to_f64(&arr[3])?;
        Some(PageSize {
            width: urx - llx,
            height: ury - lly,
        })
    }

    /// Draw the signature image at `rect` on the given page (1-based)
    ///
    /// The image lands in a new content stream appended after the existing
    /// ones, so the page's prior content is untouched.
    pub fn embed_signature(
        &mut self,
        page: u32,
        image: &SignatureImage,
        rect: &PdfRect,
    ) -> Result<(), SignError> {
        let page_id = self.page_id(page)?;

        let smask_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            image.alpha.clone(),
        ));

        let image_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "SMask" => smask_id,
            },
            image.rgb.clone(),
        ));

        // Take Resources off the page dictionary first: when the entry is an
        // indirect reference the document must be borrowed again to reach it.
        let mut resources_obj = {
            let page_dict = self
                .doc
                .get_object_mut(page_id)
                .and_then(|o| o.as_dict_mut())
                .map_err(|e| SignError::DocumentLoad(format!("page has no dictionary: {e}")))?;
            page_dict
                .remove(b"Resources")
                .unwrap_or_else(|| Object::Dictionary(dictionary! {}))
        };

        let name = match &mut resources_obj {
            Object::Reference(id) => {
                let res_dict = self
                    .doc
                    .get_object_mut(*id)
                    .and_then(|o| o.as_dict_mut())
                    .map_err(|e| {
                        SignError::DocumentLoad(format!("resources missing dictionary: {e}"))
                    })?;
                let xobjects = ensure_xobject_dict(res_dict)?;
                let name = next_xobject_name(xobjects);
                xobjects.set(name.clone(), image_id);
                name
            }
            Object::Dictionary(ref mut dict) => {
                let xobjects = ensure_xobject_dict(dict)?;
                let name = next_xobject_name(xobjects);
                xobjects.set(name.clone(), image_id);
                name
            }
            _ => {
                return Err(SignError::DocumentLoad(
                    "page resources are invalid".to_string(),
                ))
            }
        };

        {
            let page_dict = self
                .doc
                .get_object_mut(page_id)
                .and_then(|o| o.as_dict_mut())
                .map_err(|e| SignError::DocumentLoad(format!("page has no dictionary: {e}")))?;
            page_dict.set("Resources", resources_obj);
        }

        let content = format!(
            "q {} 0 0 {} {} {} cm /{} Do Q",
            rect.width, rect.height, rect.x, rect.y, name
        );
        self.doc
            .add_page_contents(page_id, content.into_bytes())
            .map_err(|e| SignError::DocumentLoad(format!("failed to append page content: {e}")))?;

        Ok(())
    }

    /// Serialize the mutated document to a fresh byte stream
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, SignError> {
        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| SignError::DocumentLoad(format!("failed to serialize document: {e}")))?;
        Ok(buffer)
    }
}

fn object_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some((*f).into()),
        _ => None,
    }
}

fn ensure_xobject_dict(
    res_dict: &mut lopdf::Dictionary,
) -> Result<&mut lopdf::Dictionary, SignError> {
    let xobj_owned = res_dict
        .remove(b"XObject")
        .unwrap_or_else(|| Object::Dictionary(dictionary! {}));

    let sanitized = match xobj_owned {
        Object::Dictionary(dict) => Object::Dictionary(dict),
        Object::Reference(_) => Object::Dictionary(dictionary! {}),
        _ => {
            return Err(SignError::DocumentLoad(
                "page XObject entry is invalid".to_string(),
            ))
        }
    };

    res_dict.set("XObject", sanitized);
    match res_dict.get_mut(b"XObject") {
        Ok(Object::Dictionary(ref mut dict)) => Ok(dict),
        _ => Err(SignError::DocumentLoad(
            "page XObject entry is invalid".to_string(),
        )),
    }
}

/// First `Sig<n>` name not already taken in the page's XObject dictionary
fn next_xobject_name(xobjects: &lopdf::Dictionary) -> String {
    let mut index = 0;
    loop {
        let name = format!("Sig{index}");
        if !xobjects.has(name.as_bytes()) {
            return name;
        }
        index += 1;
    }
}

// ============================================================================
// Tests
// ============================================================================
