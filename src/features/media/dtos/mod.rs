mod media_dto;

pub use media_dto::{MediaResponseDto, UploadMediaDto, MULTIPART_OVERHEAD};
