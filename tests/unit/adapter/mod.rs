mod thirdparty;
