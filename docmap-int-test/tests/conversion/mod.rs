mod custom_conversion_test;
mod date_format_test;
mod geo_test;
