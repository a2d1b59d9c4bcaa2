pub mod wkhtmltopdf_converter;

pub use wkhtmltopdf_converter::WkHtmlToPdfConverter;
