mod location_dto;

pub use location_dto::{
    DistrictResponseDto, LocationSearchQuery, MunicipalityResponseDto, ProvinceResponseDto,
};
