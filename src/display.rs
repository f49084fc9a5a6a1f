use watchface_core::{Display, DisplayError, Framebuffer};

/// Name the host's framebuffer presenter registers under.
const FRAME_SERVER_NAME: &str = "_Framebuffer presenter_";
/// Opcode of a frame post on the presenter's server.
const FRAME_OPCODE: u32 = 0;
/// Width and height, each a little-endian u16, ahead of the pixels.
const FRAME_HEADER_LEN: usize = 4;

/// Lends each frame to the host's graphics service as a memory message:
/// a 4-byte size header followed by packed 1-bpp rows.
pub struct FramePoster {
    xns: xous_names::XousNames,
    conn: Option<xous::CID>,
}

impl FramePoster {
    pub fn new(xns: xous_names::XousNames) -> Self {
        Self { xns, conn: None }
    }

    fn connection(&mut self) -> Result<xous::CID, DisplayError> {
        if let Some(conn) = self.conn {
            return Ok(conn);
        }
        // The presenter may come up after us; keep asking until it does
        let conn = self
            .xns
            .request_connection(FRAME_SERVER_NAME)
            .map_err(|_| DisplayError::Unavailable)?;
        log::info!("connected to {}", FRAME_SERVER_NAME);
        self.conn = Some(conn);
        Ok(conn)
    }
}

impl Display for FramePoster {
    fn present(&mut self, frame: &Framebuffer) -> Result<(), DisplayError> {
        let conn = self.connection()?;
        let pixels = frame.as_bytes();
        let size = embedded_graphics::prelude::OriginDimensions::size(frame);

        let mut buf = xous_ipc::Buffer::new(FRAME_HEADER_LEN + pixels.len());
        buf[0..2].copy_from_slice(&(size.width as u16).to_le_bytes());
        buf[2..4].copy_from_slice(&(size.height as u16).to_le_bytes());
        buf[FRAME_HEADER_LEN..FRAME_HEADER_LEN + pixels.len()].copy_from_slice(pixels);

        buf.lend(conn, FRAME_OPCODE)
            .map(|_| ())
            .map_err(|e| DisplayError::Post(format!("{:?}", e)))
    }
}
