//! Linux framebuffer output.
//!
//! Opens a fbdev device (`/dev/fb0` by default), queries its geometry via
//! the `FBIOGET_*SCREENINFO` ioctls and maps the pixel memory into the
//! process. Frames are written pixel by pixel honoring the device stride;
//! 32 bpp (XRGB) and 16 bpp (RGB565) visuals are supported.

use super::{Screen, ScreenError};
use image::RgbaImage;
use memmap2::MmapMut;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::AsRawFd;
use std::path::Path;
use tracing::info;

const FBIOGET_VSCREENINFO: libc::c_ulong = 0x4600;
const FBIOGET_FSCREENINFO: libc::c_ulong = 0x4602;

// The ioctl structs mirror the kernel ABI; most fields exist only for
// layout.
#[repr(C)]
#[derive(Clone, Copy)]
#[allow(dead_code)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// Mirror of `struct fb_var_screeninfo` from `<linux/fb.h>`.
#[repr(C)]
#[allow(dead_code)]
struct FbVarScreeninfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

/// Mirror of `struct fb_fix_screeninfo` from `<linux/fb.h>`.
#[repr(C)]
#[allow(dead_code)]
struct FbFixScreeninfo {
    id: [u8; 16],
    smem_start: libc::c_ulong,
    smem_len: u32,
    fb_type: u32,
    type_aux: u32,
    visual: u32,
    xpanstep: u16,
    ypanstep: u16,
    ywrapstep: u16,
    line_length: u32,
    mmio_start: libc::c_ulong,
    mmio_len: u32,
    accel: u32,
    capabilities: u16,
    reserved: [u16; 2],
}

/// Pack an RGB triple into little-endian RGB565.
fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    (((r >> 3) as u16) << 11) | (((g >> 2) as u16) << 5) | ((b >> 3) as u16)
}

/// Direct-rendering screen over a Linux framebuffer device.
pub struct FramebufferScreen {
    // Keeps the device open for the lifetime of the mapping.
    _file: File,
    map: MmapMut,
    width: u32,
    height: u32,
    bpp: u32,
    stride: usize,
}

impl FramebufferScreen {
    /// Open a framebuffer device and map its pixel memory.
    ///
    /// # Errors
    ///
    /// Fails when the device cannot be opened (missing permissions on
    /// `/dev/fb0` are the usual cause), when the geometry ioctls fail, or
    /// when the device runs at a depth other than 16 or 32 bpp.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScreenError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| ScreenError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let fd = file.as_raw_fd();
        let mut vinfo: FbVarScreeninfo = unsafe { std::mem::zeroed() };
        let mut finfo: FbFixScreeninfo = unsafe { std::mem::zeroed() };

        // SAFETY: fd is a valid open framebuffer descriptor and the structs
        // match the kernel ABI layout.
        let rc = unsafe { libc::ioctl(fd, FBIOGET_FSCREENINFO, &mut finfo) };
        if rc < 0 {
            return Err(ScreenError::Ioctl(io::Error::last_os_error()));
        }
        let rc = unsafe { libc::ioctl(fd, FBIOGET_VSCREENINFO, &mut vinfo) };
        if rc < 0 {
            return Err(ScreenError::Ioctl(io::Error::last_os_error()));
        }

        let bpp = vinfo.bits_per_pixel;
        if bpp != 16 && bpp != 32 {
            return Err(ScreenError::UnsupportedDepth(bpp));
        }

        let stride = finfo.line_length as usize;
        let size = stride * vinfo.yres as usize;
        // SAFETY: the mapping covers exactly the visible framebuffer and
        // lives no longer than the file descriptor it was created from.
        let map = unsafe { MmapMut::map_mut(&file) }
            .or_else(|_| {
                // Some drivers reject mapping beyond smem_len metadata;
                // retry with the explicit visible size.
                unsafe { memmap2::MmapOptions::new().len(size).map_mut(&file) }
            })
            .map_err(ScreenError::Map)?;

        info!(
            width = vinfo.xres,
            height = vinfo.yres,
            bpp,
            stride,
            device = %path.display(),
            "framebuffer opened"
        );

        Ok(Self {
            _file: file,
            map,
            width: vinfo.xres,
            height: vinfo.yres,
            bpp,
            stride,
        })
    }
}

impl Screen for FramebufferScreen {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn present(&mut self, frame: &RgbaImage) -> Result<(), ScreenError> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(ScreenError::FrameSize {
                expected_w: self.width,
                expected_h: self.height,
                actual_w: frame.width(),
                actual_h: frame.height(),
            });
        }

        for (y, row) in frame.rows().enumerate() {
            let line = y * self.stride;
            match self.bpp {
                32 => {
                    for (x, px) in row.enumerate() {
                        let off = line + x * 4;
                        // fbdev 32 bpp is little-endian XRGB: B, G, R, X.
                        self.map[off] = px[2];
                        self.map[off + 1] = px[1];
                        self.map[off + 2] = px[0];
                        self.map[off + 3] = 0xFF;
                    }
                }
                16 => {
                    for (x, px) in row.enumerate() {
                        let off = line + x * 2;
                        let v = rgb565(px[0], px[1], px[2]);
                        self.map[off..off + 2].copy_from_slice(&v.to_le_bytes());
                    }
                }
                _ => unreachable!("depth validated at open"),
            }
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ScreenError> {
        self.map.fill(0);
        Ok(())
    }
}

impl Drop for FramebufferScreen {
    fn drop(&mut self) {
        // Leave a blanked screen behind, not the last image.
        let _ = self.clear();
    }
}
